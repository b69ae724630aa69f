//! Batch registration and update, result ordering
//!
//! Batch operations apply each request on its own. A request that fails
//! validation or conflicts with the store is recorded in
//! [`BatchOutcome::errors`] and the batch moves on; a failure of the store
//! itself ends the batch.

use serde::Deserialize;

use crate::error::{RepoError, Result};
use crate::policy::PS_GALLERY_NAME;
use crate::record::{
    Authentication, DEFAULT_PRIORITY, Repository, RepositoryPatch, parse_url, validate_priority,
};
use crate::store::RepositoryStore;

/// Records produced by a batch alongside per-item failures
#[derive(Debug)]
pub struct BatchOutcome<T> {
    pub items: Vec<T>,
    pub errors: Vec<RepoError>,
}

impl<T> BatchOutcome<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// True when no item failed
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    fn record(&mut self, result: Result<Option<T>>) -> Result<()> {
        match result {
            Ok(Some(item)) => self.items.push(item),
            Ok(None) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::debug!("Batch item failed: {}", e);
                self.errors.push(e);
            }
        }
        Ok(())
    }
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort by ascending priority, then by name
///
/// Consumers search repositories in this order, so it is part of the
/// store's contract.
pub fn sort_repositories(repos: &mut [Repository]) {
    repos.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.name.cmp(&b.name)));
}

/// Authentication as written in a request file; both keys required
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AuthenticationRequest {
    pub vault_name: Option<String>,
    pub secret: Option<String>,
}

impl AuthenticationRequest {
    pub fn resolve(&self) -> Result<Authentication> {
        Authentication::new(self.vault_name.as_deref(), self.secret.as_deref())
    }
}

/// One repository to register
///
/// ```yaml
/// - name: Internal
///   url: https://nuget.example.com/v2
///   priority: 10
///   authentication:
///     vaultName: CorpVault
///     secret: nuget-token
/// - psGallery: true
///   trusted: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistrationRequest {
    /// Register the PowerShell Gallery instead of a named repository
    #[serde(default)]
    pub ps_gallery: bool,
    pub name: Option<String>,
    pub url: Option<String>,
    pub priority: Option<i64>,
    pub trusted: Option<bool>,
    pub authentication: Option<AuthenticationRequest>,
}

/// Changes to one registered repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    pub priority: Option<i64>,
    pub trusted: Option<bool>,
    pub authentication: Option<AuthenticationRequest>,
}

impl UpdateRequest {
    /// Name and patch this request describes
    pub fn to_patch(&self) -> Result<(String, RepositoryPatch)> {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| RepoError::invalid_name("", "repository entry must include a name"))?;

        let mut patch = RepositoryPatch::new();
        if let Some(url) = &self.url {
            patch = patch.url(parse_url(url)?);
        }
        if let Some(priority) = self.priority {
            patch = patch.priority(validate_priority(priority)?);
        }
        if let Some(trusted) = self.trusted {
            patch = patch.trusted(trusted);
        }
        if let Some(auth) = &self.authentication {
            patch = patch.authentication(auth.resolve()?);
        }
        Ok((name.to_string(), patch))
    }
}

impl RepositoryStore {
    /// Register several repositories, collecting per-item failures
    pub fn register_many(&self, requests: &[RegistrationRequest]) -> Result<BatchOutcome<Repository>> {
        let mut outcome = BatchOutcome::new();
        for request in requests {
            outcome.record(self.register_request(request))?;
        }
        Ok(outcome)
    }

    /// Update several repositories, collecting per-item failures
    pub fn update_many(&self, requests: &[UpdateRequest]) -> Result<BatchOutcome<Repository>> {
        let mut outcome = BatchOutcome::new();
        for request in requests {
            let result = request
                .to_patch()
                .and_then(|(name, patch)| self.update(&name, &patch));
            outcome.record(result)?;
        }
        Ok(outcome)
    }

    fn register_request(&self, request: &RegistrationRequest) -> Result<Option<Repository>> {
        let priority = match request.priority {
            Some(priority) => validate_priority(priority)?,
            None => DEFAULT_PRIORITY,
        };
        let trusted = request.trusted.unwrap_or(false);

        if request.ps_gallery {
            if request.name.is_some() || request.url.is_some() || request.authentication.is_some() {
                return Err(RepoError::ReservedNameConflict {
                    name: PS_GALLERY_NAME.to_string(),
                    message: "a psGallery entry cannot also set name, url or authentication"
                        .to_string(),
                });
            }
            return self.register_well_known(PS_GALLERY_NAME, priority, trusted);
        }

        let name = request
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| RepoError::invalid_name("", "repository entry must include a name"))?;
        let url = request
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| RepoError::invalid_url("", "repository entry must include a url"))?;

        let mut repo = Repository::new(name, url)?
            .with_priority(priority)
            .with_trusted(trusted);
        if let Some(auth) = &request.authentication {
            repo = repo.with_authentication(auth.resolve()?);
        }

        tracing::debug!("Registering '{}' from batch request", repo.name);
        self.add(repo)
    }
}
