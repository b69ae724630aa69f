//! Repository records and their validation rules
//!
//! Everything here is pure: no file access, no logging. The store engine
//! re-runs these checks on every mutation regardless of what the caller
//! already validated.

use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::error::{RepoError, Result};

/// Priority assigned when none is given
pub const DEFAULT_PRIORITY: u8 = 50;

/// Largest (lowest precedence) priority value
pub const MAX_PRIORITY: u8 = 50;

/// URL schemes a repository may use
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp", "file"];

/// A registered package repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Unique name, compared case-insensitively
    pub name: String,

    /// Absolute repository location
    pub url: Url,

    /// Search precedence, lower is searched first
    pub priority: u8,

    /// Whether installs from this repository skip the trust prompt
    pub trusted: bool,

    /// Reference to the secret holding credentials for this repository
    pub authentication: Option<Authentication>,
}

impl Repository {
    /// Create an untrusted repository with default priority
    pub fn new(name: impl Into<String>, url: &str) -> Result<Self> {
        let name = validate_name(&name.into())?;
        let url = parse_url(url)?;
        validate_url(&url)?;

        Ok(Self {
            name,
            url,
            priority: DEFAULT_PRIORITY,
            trusted: false,
            authentication: None,
        })
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_trusted(mut self, trusted: bool) -> Self {
        self.trusted = trusted;
        self
    }

    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// Check every field, returning the record with its name trimmed
    pub fn validated(mut self) -> Result<Self> {
        self.name = validate_name(&self.name)?;
        validate_url(&self.url)?;
        validate_priority(i64::from(self.priority))?;
        if let Some(auth) = &self.authentication {
            Authentication::new(Some(&auth.vault_name), Some(&auth.secret))?;
        }
        Ok(self)
    }
}

/// Vault/secret pair naming where credentials for a repository live
///
/// The store records the reference only; it never resolves the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authentication {
    pub vault_name: String,
    pub secret: String,
}

impl Authentication {
    /// Build a reference from caller input; both parts are required
    pub fn new(vault_name: Option<&str>, secret: Option<&str>) -> Result<Self> {
        match (non_empty(vault_name), non_empty(secret)) {
            (Some(vault_name), Some(secret)) => Ok(Self {
                vault_name: vault_name.to_string(),
                secret: secret.to_string(),
            }),
            _ => Err(RepoError::InvalidAuthentication {
                message: "must include VaultName and Secret with non-empty values".to_string(),
            }),
        }
    }

    /// Rebuild a reference from stored attributes: both or neither
    pub fn from_stored(vault_name: Option<&str>, secret: Option<&str>) -> Result<Option<Self>> {
        match (vault_name, secret) {
            (None, None) => Ok(None),
            (vault_name, secret) => Self::new(vault_name, secret).map(Some),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Field of a repository record, used by reservation policies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryField {
    Url,
    Priority,
    Trusted,
    Authentication,
}

impl std::fmt::Display for RepositoryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RepositoryField::Url => "URL",
            RepositoryField::Priority => "priority",
            RepositoryField::Trusted => "trusted flag",
            RepositoryField::Authentication => "authentication",
        };
        f.write_str(name)
    }
}

/// Requested changes to an existing repository
///
/// `None` means "leave as is"; there is no way to clear a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryPatch {
    pub url: Option<Url>,
    pub priority: Option<u8>,
    pub trusted: Option<bool>,
    pub authentication: Option<Authentication>,
}

impl RepositoryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn trusted(mut self, trusted: bool) -> Self {
        self.trusted = Some(trusted);
        self
    }

    pub fn authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// True when no field was requested
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Fields this patch would change
    pub fn fields(&self) -> Vec<RepositoryField> {
        let mut fields = Vec::new();
        if self.url.is_some() {
            fields.push(RepositoryField::Url);
        }
        if self.priority.is_some() {
            fields.push(RepositoryField::Priority);
        }
        if self.trusted.is_some() {
            fields.push(RepositoryField::Trusted);
        }
        if self.authentication.is_some() {
            fields.push(RepositoryField::Authentication);
        }
        fields
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(url) = &self.url {
            validate_url(url)?;
        }
        if let Some(priority) = self.priority {
            validate_priority(i64::from(priority))?;
        }
        if let Some(auth) = &self.authentication {
            Authentication::new(Some(&auth.vault_name), Some(&auth.secret))?;
        }
        Ok(())
    }
}

/// Trim a repository name and reject empty names or names with `*`
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RepoError::invalid_name(
            name,
            "name cannot be empty or just whitespace",
        ));
    }
    if trimmed.contains('*') {
        return Err(RepoError::invalid_name(name, "name cannot contain '*'"));
    }
    Ok(trimmed.to_string())
}

/// Reject URLs whose scheme is not http, https, ftp or file
pub fn validate_url(url: &Url) -> Result<()> {
    if ALLOWED_SCHEMES.contains(&url.scheme()) {
        Ok(())
    } else {
        Err(RepoError::invalid_url(
            url.as_str(),
            "must use one of the following schemes: http, https, ftp, file",
        ))
    }
}

/// Check a priority is within `0..=50`
pub fn validate_priority(priority: i64) -> Result<u8> {
    u8::try_from(priority)
        .ok()
        .filter(|p| *p <= MAX_PRIORITY)
        .ok_or(RepoError::InvalidPriority { priority })
}

/// Parse user input into an absolute URL
///
/// Input that is not an absolute URI is taken as a filesystem path,
/// resolved against the current directory.
pub fn parse_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RepoError::invalid_url(raw, "URL cannot be empty"));
    }

    match Url::parse(trimmed) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let path = std::path::absolute(Path::new(trimmed))
                .map_err(|e| RepoError::invalid_url(raw, e.to_string()))?;
            Url::from_file_path(&path)
                .map_err(|()| RepoError::invalid_url(raw, "not a valid absolute path"))
        }
        Err(e) => Err(RepoError::invalid_url(raw, e.to_string())),
    }
}

/// Case-insensitive comparison of two repository names, ignoring
/// surrounding whitespace
pub fn names_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    a.to_lowercase() == b.to_lowercase()
}
