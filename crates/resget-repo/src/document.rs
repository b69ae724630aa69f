//! On-disk repository store document
//!
//! The store is a single YAML file:
//!
//! ```yaml
//! repositories:
//! - name: PSGallery
//!   url: https://www.powershellgallery.com/api/v2
//!   priority: 50
//!   trusted: false
//! ```
//!
//! Entries are kept as loosely typed as the file itself so that a hand
//! edited, malformed entry only affects that entry. Conversion to a
//! [`Repository`] happens in [`RepositoryEntry::resolve`].

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::io::Write;
use std::path::Path;
use url::Url;

use crate::error::{RepoError, Result};
use crate::record::{Authentication, Repository, RepositoryPatch, names_match, validate_priority};

/// The whole store file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Registered repositories, in file order
    #[serde(default)]
    pub repositories: Vec<RepositoryEntry>,
}

/// One stored repository, as written in the file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryEntry {
    pub name: String,

    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl StoreDocument {
    /// Parse store file contents
    ///
    /// Empty input is rejected: a valid store always has a root.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        if content.trim().is_empty() {
            return Err("store file is empty".to_string());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load the store file
    pub fn load(path: &Path) -> Result<Self> {
        let unreadable = |message: String| RepoError::StoreUnreadable {
            path: path.display().to_string(),
            message,
        };

        if !path.exists() {
            return Err(unreadable(
                "repository store does not exist; initialize it first".to_string(),
            ));
        }
        let content = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        Self::parse(&content).map_err(unreadable)
    }

    /// Rewrite the whole store file
    ///
    /// The document is written to a temporary file next to the store and
    /// renamed over it, so readers see either the old or the new file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let write_failed = |message: String| RepoError::StoreWriteFailed {
            path: path.display().to_string(),
            message,
        };

        let content = serde_yaml::to_string(self).map_err(|e| write_failed(e.to_string()))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_failed(e.to_string()))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| write_failed(e.to_string()))?;
        tmp.persist(path).map_err(|e| write_failed(e.error.to_string()))?;
        Ok(())
    }

    /// Find an entry by name (case-insensitive)
    pub fn find(&self, name: &str) -> Option<&RepositoryEntry> {
        self.repositories.iter().find(|e| names_match(&e.name, name))
    }

    /// Find a mutable entry by name (case-insensitive)
    pub fn find_mut(&mut self, name: &str) -> Option<&mut RepositoryEntry> {
        self.repositories
            .iter_mut()
            .find(|e| names_match(&e.name, name))
    }

    /// Remove an entry by name (case-insensitive)
    pub fn remove(&mut self, name: &str) -> Option<RepositoryEntry> {
        let idx = self
            .repositories
            .iter()
            .position(|e| names_match(&e.name, name))?;
        Some(self.repositories.remove(idx))
    }

    /// Append an entry
    pub fn push(&mut self, entry: RepositoryEntry) {
        self.repositories.push(entry);
    }
}

impl RepositoryEntry {
    /// Build the stored form of a record
    pub fn from_repository(repo: &Repository) -> Self {
        let mut entry = Self {
            name: repo.name.clone(),
            url: repo.url.to_string(),
            priority: Some(Value::from(repo.priority)),
            trusted: Some(Value::Bool(repo.trusted)),
            vault_name: None,
            secret: None,
        };
        if let Some(auth) = &repo.authentication {
            entry.set_authentication(auth);
        }
        entry
    }

    /// Store both halves of an authentication reference
    pub fn set_authentication(&mut self, auth: &Authentication) {
        self.vault_name = Some(auth.vault_name.clone());
        self.secret = Some(auth.secret.clone());
    }

    /// Overwrite the fields a patch requests, leaving the rest untouched
    pub fn apply(&mut self, patch: &RepositoryPatch) {
        if let Some(url) = &patch.url {
            self.url = url.to_string();
        }
        if let Some(priority) = patch.priority {
            self.priority = Some(Value::from(priority));
        }
        if let Some(trusted) = patch.trusted {
            self.trusted = Some(Value::Bool(trusted));
        }
        if let Some(auth) = &patch.authentication {
            self.set_authentication(auth);
        }
    }

    /// Convert to a checked record
    ///
    /// Fails on an unparseable URL, a missing or malformed priority or
    /// trust flag, or a half-present authentication reference.
    pub fn resolve(&self) -> Result<Repository> {
        let url = Url::parse(self.url.trim()).map_err(|_| RepoError::MalformedStoredUrl {
            name: self.name.clone(),
            url: self.url.clone(),
        })?;

        let priority = parse_priority(self.priority.as_ref())
            .map_err(|message| RepoError::malformed(&self.name, message))?;
        let trusted = parse_trusted(self.trusted.as_ref())
            .map_err(|message| RepoError::malformed(&self.name, message))?;
        let authentication =
            Authentication::from_stored(self.vault_name.as_deref(), self.secret.as_deref())
                .map_err(|_| {
                    RepoError::malformed(
                        &self.name,
                        "invalid authentication information; VaultName and Secret should \
                         both be present and non-empty",
                    )
                })?;

        Ok(Repository {
            name: self.name.clone(),
            url,
            priority,
            trusted,
            authentication,
        })
    }
}

fn parse_priority(value: Option<&Value>) -> std::result::Result<u8, String> {
    let raw = match value {
        None | Some(Value::Null) => return Err("missing Priority".to_string()),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    let raw = raw.ok_or_else(|| format!("malformed Priority value {}", describe(value)))?;
    validate_priority(raw).map_err(|e| e.to_string())
}

fn parse_trusted(value: Option<&Value>) -> std::result::Result<bool, String> {
    match value {
        None | Some(Value::Null) => Err("missing Trusted".to_string()),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
        Some(other) => Err(format!("malformed Trusted value {}", describe(Some(other)))),
    }
}

fn describe(value: Option<&Value>) -> String {
    value
        .and_then(|v| serde_yaml::to_string(v).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(yaml: &str) -> RepositoryEntry {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_resolve_text_attributes() {
        let repo = entry(
            "name: Local\nurl: file:///srv/repo\npriority: '10'\ntrusted: 'True'\n",
        )
        .resolve()
        .unwrap();
        assert_eq!(repo.priority, 10);
        assert!(repo.trusted);
        assert!(repo.authentication.is_none());
    }

    #[test]
    fn test_resolve_native_attributes() {
        let repo = entry(
            "name: Corp\nurl: https://corp.example.com/v2\npriority: 0\ntrusted: false\n\
             vaultName: CorpVault\nsecret: token\n",
        )
        .resolve()
        .unwrap();
        assert_eq!(repo.priority, 0);
        assert!(!repo.trusted);
        let auth = repo.authentication.unwrap();
        assert_eq!(auth.vault_name, "CorpVault");
        assert_eq!(auth.secret, "token");
    }

    #[test]
    fn test_resolve_rejects_bad_url() {
        let err = entry("name: Bad\nurl: not a url\npriority: 1\ntrusted: false\n")
            .resolve()
            .unwrap_err();
        assert!(matches!(err, RepoError::MalformedStoredUrl { .. }));
    }

    #[test]
    fn test_resolve_rejects_partial_authentication() {
        let err = entry(
            "name: Half\nurl: https://example.com\npriority: 1\ntrusted: false\nvaultName: V\n",
        )
        .resolve()
        .unwrap_err();
        assert!(matches!(err, RepoError::MalformedRecord { .. }));
    }

    #[test]
    fn test_resolve_rejects_malformed_scalars() {
        for yaml in [
            "name: A\nurl: https://a.example\npriority: high\ntrusted: false\n",
            "name: A\nurl: https://a.example\npriority: 99\ntrusted: false\n",
            "name: A\nurl: https://a.example\ntrusted: false\n",
            "name: A\nurl: https://a.example\npriority: 5\ntrusted: yes please\n",
            "name: A\nurl: https://a.example\npriority: 5\ntrusted: 1\n",
        ] {
            assert!(
                matches!(entry(yaml).resolve(), Err(RepoError::MalformedRecord { .. })),
                "{yaml}"
            );
        }
    }

    #[test]
    fn test_apply_leaves_absent_fields() {
        let mut stored = entry(
            "name: Corp\nurl: https://corp.example.com\npriority: '7'\ntrusted: 'True'\n\
             vaultName: Old\nsecret: old-token\n",
        );
        stored.apply(&RepositoryPatch::new().trusted(false));
        let repo = stored.resolve().unwrap();
        assert_eq!(repo.priority, 7);
        assert!(!repo.trusted);
        assert_eq!(repo.authentication.as_ref().unwrap().vault_name, "Old");

        stored.apply(
            &RepositoryPatch::new()
                .authentication(Authentication::new(Some("New"), Some("new-token")).unwrap()),
        );
        let auth = stored.resolve().unwrap().authentication.unwrap();
        assert_eq!(auth.vault_name, "New");
        assert_eq!(auth.secret, "new-token");
    }

    #[test]
    fn test_apply_completes_half_authentication() {
        let mut stored = entry(
            "name: Half\nurl: https://example.com\npriority: 1\ntrusted: false\nsecret: s\n",
        );
        stored.apply(
            &RepositoryPatch::new()
                .authentication(Authentication::new(Some("Vault"), Some("s2")).unwrap()),
        );
        assert!(stored.resolve().unwrap().authentication.is_some());
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        assert!(StoreDocument::parse("").is_err());
        assert!(StoreDocument::parse("repositories: [unclosed").is_err());
        assert!(StoreDocument::parse("repositories:\n- url: https://no.name\n").is_err());
        assert_eq!(
            StoreDocument::parse("repositories: []\n").unwrap(),
            StoreDocument::default()
        );
    }

    #[test]
    fn test_entry_round_trip_through_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("repositories.yaml");

        let repo = Repository::new("Corp", "https://corp.example.com/v2")
            .unwrap()
            .with_priority(5)
            .with_authentication(Authentication::new(Some("Vault"), Some("token")).unwrap());

        let mut doc = StoreDocument::default();
        doc.push(RepositoryEntry::from_repository(&repo));
        doc.save(&path).unwrap();

        let loaded = StoreDocument::load(&path).unwrap();
        assert_eq!(loaded.find("CORP").unwrap().resolve().unwrap(), repo);
    }

    #[test]
    fn test_find_and_remove() {
        let mut doc = StoreDocument::default();
        doc.push(RepositoryEntry::from_repository(
            &Repository::new("Local", "file:///srv/repo").unwrap(),
        ));
        assert!(doc.find("local").is_some());
        assert!(doc.find_mut(" LOCAL ").is_some());
        assert!(doc.remove("Other").is_none());
        assert_eq!(doc.remove("LOCAL").unwrap().name, "Local");
        assert!(doc.repositories.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = StoreDocument::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, RepoError::StoreUnreadable { .. }));
    }
}
