//! Repository store engine
//!
//! Each operation loads the store file, works on the in-memory document
//! and rewrites the whole file when something changed. Nothing is cached
//! between calls.

use std::collections::BTreeSet;
use std::path::Path;

use crate::batch::{BatchOutcome, sort_repositories};
use crate::config::StoreOptions;
use crate::document::{RepositoryEntry, StoreDocument};
use crate::error::{RepoError, Result};
use crate::gate::{AlwaysProceed, ShouldProcess};
use crate::lock::StoreLock;
use crate::policy;
use crate::record::{Repository, RepositoryPatch, validate_name, validate_priority};
use crate::wildcard::{NamePattern, selects_all};

const ACTION_REGISTER: &str = "Register repository to repository store";
const ACTION_SET: &str = "Set repository's value(s) in repository store";
const ACTION_UNREGISTER: &str = "Unregister repository from repository store";

/// Persistent store of registered repositories
pub struct RepositoryStore {
    options: StoreOptions,
    gate: Box<dyn ShouldProcess>,
}

impl std::fmt::Debug for RepositoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryStore")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl RepositoryStore {
    pub fn new(options: StoreOptions) -> Self {
        Self {
            options,
            gate: Box::new(AlwaysProceed),
        }
    }

    /// Store at `path`, unlocked, with no confirmation
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(StoreOptions::at(path))
    }

    /// Store configured from the environment
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(StoreOptions::from_env()?))
    }

    /// Ask `gate` before every mutation
    pub fn with_gate(mut self, gate: impl ShouldProcess + 'static) -> Self {
        self.gate = Box::new(gate);
        self
    }

    pub fn path(&self) -> &Path {
        &self.options.path
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Create the store file with its seeded repositories if it is missing,
    /// otherwise check that it parses
    pub fn initialize(&self) -> Result<()> {
        let _lock = self.guard()?;
        let path = self.path();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| RepoError::StoreWriteFailed {
                    path: path.display().to_string(),
                    message: format!("repository store creation failed: {}", e),
                })?;
            }
            StoreDocument::default().save(path)?;
            tracing::info!("Created repository store at {}", path.display());

            for known in policy::seeded() {
                self.insert(known.seed()?)?;
            }
            return Ok(());
        }

        let content = std::fs::read_to_string(path).map_err(|e| RepoError::StoreUnreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        StoreDocument::parse(&content).map_err(|message| RepoError::StoreCorrupt {
            path: path.display().to_string(),
            message,
        })?;
        Ok(())
    }

    /// Register a new repository
    ///
    /// Returns `Ok(None)` when the gate vetoes the registration.
    pub fn add(&self, repo: Repository) -> Result<Option<Repository>> {
        let repo = repo.validated()?;
        if let Some(known) = policy::well_known(&repo.name) {
            return Err(RepoError::ReservedNameConflict {
                name: known.name.to_string(),
                message: "this name is reserved and cannot be registered with a custom URL; \
                          use the well-known registration instead"
                    .to_string(),
            });
        }

        tracing::debug!(
            "All required values to register '{}' provided, adding to repository store",
            repo.name
        );
        if !self.gate.should_process(&repo.name, ACTION_REGISTER) {
            tracing::debug!("Registration of '{}' declined", repo.name);
            return Ok(None);
        }

        let _lock = self.guard()?;
        self.insert(repo).map(Some)
    }

    /// Register a well-known repository at its fixed URL
    pub fn register_well_known(
        &self,
        name: &str,
        priority: u8,
        trusted: bool,
    ) -> Result<Option<Repository>> {
        let known = policy::well_known(name)
            .ok_or_else(|| RepoError::invalid_name(name, "not a well-known repository"))?;
        let priority = validate_priority(i64::from(priority))?;
        let repo = known.to_repository(priority, trusted)?;

        tracing::debug!("Registering well-known repository '{}'", known.name);
        if !self.gate.should_process(known.name, ACTION_REGISTER) {
            tracing::debug!("Registration of '{}' declined", known.name);
            return Ok(None);
        }

        let _lock = self.guard()?;
        self.insert(repo).map(Some)
    }

    /// Change fields of an existing repository
    ///
    /// Fields absent from `patch` keep their stored value. Returns the
    /// record as stored after the update, or `Ok(None)` when the gate
    /// vetoes it.
    pub fn update(&self, name: &str, patch: &RepositoryPatch) -> Result<Option<Repository>> {
        let name = validate_name(name)?;
        patch.validate()?;
        if let Some(known) = policy::well_known(&name) {
            known.check_fields(&patch.fields())?;
        }
        if patch.is_empty() {
            return Err(RepoError::NothingToUpdate { name });
        }

        tracing::debug!(
            "All required values to set '{}' provided, updating repository store",
            name
        );
        if !self.gate.should_process(&name, ACTION_SET) {
            tracing::debug!("Update of '{}' declined", name);
            return Ok(None);
        }

        let _lock = self.guard()?;
        let mut doc = StoreDocument::load(self.path())?;
        let entry = doc
            .find_mut(&name)
            .ok_or_else(|| RepoError::not_found(name.as_str()))?;
        entry.apply(patch);
        let updated = entry.resolve()?;

        doc.save(self.path())?;
        tracing::info!("Updated repository '{}'", updated.name);
        Ok(Some(updated))
    }

    /// Unregister repositories by exact name (case-insensitive)
    ///
    /// Names that match nothing are reported in the returned list; the
    /// others are still removed. The file is rewritten once at the end.
    pub fn remove<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<RepoError>> {
        if names.is_empty() {
            return Err(RepoError::invalid_name(
                "",
                "at least one repository name is required",
            ));
        }

        let _lock = self.guard()?;
        let mut doc = StoreDocument::load(self.path())?;
        let mut errors = Vec::new();
        let mut removed = 0usize;

        for raw in names {
            let name = raw.as_ref().trim();
            if doc.find(name).is_none() {
                errors.push(RepoError::not_found(name));
                continue;
            }
            if !self.gate.should_process(name, ACTION_UNREGISTER) {
                tracing::debug!("Removal of '{}' declined", name);
                continue;
            }
            if let Some(entry) = doc.remove(name) {
                tracing::info!("Unregistered repository '{}'", entry.name);
                removed += 1;
            }
        }

        if removed > 0 {
            doc.save(self.path())?;
        }
        Ok(errors)
    }

    /// Look up repositories by name or wildcard pattern
    ///
    /// An empty list or a lone `*` returns everything. Results are sorted
    /// by priority, then name. Exact names that match nothing and stored
    /// entries that fail to resolve are reported as errors.
    pub fn read<S: AsRef<str>>(&self, names: &[S]) -> Result<BatchOutcome<Repository>> {
        let _lock = self.guard()?;
        let doc = StoreDocument::load(self.path())?;
        let mut outcome = BatchOutcome::new();

        let selected: BTreeSet<usize> = if selects_all(names) {
            (0..doc.repositories.len()).collect()
        } else {
            let mut selected = BTreeSet::new();
            for raw in names {
                let pattern = NamePattern::parse(raw.as_ref());
                let before = selected.len();
                let mut matched = false;
                for (idx, entry) in doc.repositories.iter().enumerate() {
                    if pattern.matches(&entry.name) {
                        matched = true;
                        selected.insert(idx);
                    }
                }
                tracing::debug!(
                    "Pattern '{}' selected {} new repositories",
                    pattern.as_str(),
                    selected.len() - before
                );
                if !matched && !pattern.is_wildcard() {
                    outcome.errors.push(RepoError::not_found(pattern.as_str()));
                }
            }
            selected
        };

        for idx in selected {
            match doc.repositories[idx].resolve() {
                Ok(repo) => outcome.items.push(repo),
                Err(e) => {
                    tracing::warn!("Skipping stored repository: {}", e);
                    outcome.errors.push(e);
                }
            }
        }

        sort_repositories(&mut outcome.items);
        Ok(outcome)
    }

    /// Append a record after checking its name is free; caller holds the lock
    fn insert(&self, repo: Repository) -> Result<Repository> {
        let mut doc = StoreDocument::load(self.path())?;
        if doc.find(&repo.name).is_some() {
            return Err(RepoError::DuplicateName { name: repo.name });
        }

        doc.push(RepositoryEntry::from_repository(&repo));
        doc.save(self.path())?;
        tracing::info!("Registered repository '{}' ({})", repo.name, repo.url);
        Ok(repo)
    }

    fn guard(&self) -> Result<Option<StoreLock>> {
        if self.options.lock {
            StoreLock::acquire(self.path()).map(Some)
        } else {
            Ok(None)
        }
    }
}
