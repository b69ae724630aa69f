//! Error types for repository store operations

use thiserror::Error;

/// Repository store errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Validation Errors ============
    #[error("Invalid repository name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid repository URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid priority {priority}: must be between 0 and 50")]
    InvalidPriority { priority: i64 },

    #[error("Invalid authentication: {message}")]
    InvalidAuthentication { message: String },

    #[error("Repository '{name}': {message}")]
    ReservedNameConflict { name: String, message: String },

    #[error("Nothing to update for repository '{name}': set a URL, priority, trust flag or authentication")]
    NothingToUpdate { name: String },

    // ============ Lookup Errors ============
    #[error("Repository already exists: {name}")]
    DuplicateName { name: String },

    #[error("Repository not found: {name}")]
    NotFound { name: String },

    // ============ Stored Record Errors ============
    #[error("Unable to read incorrectly formatted URL '{url}' for repository {name}")]
    MalformedStoredUrl { name: String, url: String },

    #[error("Repository {name} has invalid stored data: {message}")]
    MalformedRecord { name: String, message: String },

    // ============ Store Errors ============
    #[error("Repository store may be corrupted ({path}): {message}")]
    StoreCorrupt { path: String, message: String },

    #[error("Loading repository store failed ({path}): {message}")]
    StoreUnreadable { path: String, message: String },

    #[error("Writing repository store failed ({path}): {message}")]
    StoreWriteFailed { path: String, message: String },

    #[error("Invalid store configuration: {message}")]
    InvalidConfig { message: String },
}

impl RepoError {
    /// Whether this error concerns the store as a whole rather than one record.
    ///
    /// Batch operations stop on fatal errors and collect the rest.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RepoError::StoreCorrupt { .. }
                | RepoError::StoreUnreadable { .. }
                | RepoError::StoreWriteFailed { .. }
                | RepoError::InvalidConfig { .. }
        )
    }

    pub(crate) fn not_found(name: impl Into<String>) -> Self {
        RepoError::NotFound { name: name.into() }
    }

    pub(crate) fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        RepoError::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        RepoError::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(name: impl Into<String>, message: impl Into<String>) -> Self {
        RepoError::MalformedRecord {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result type for repository store operations
pub type Result<T> = std::result::Result<T, RepoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(
            RepoError::StoreCorrupt {
                path: "/tmp/x".into(),
                message: "bad".into()
            }
            .is_fatal()
        );
        assert!(!RepoError::not_found("Foo").is_fatal());
        assert!(!RepoError::DuplicateName { name: "Foo".into() }.is_fatal());
    }

    #[test]
    fn test_error_messages() {
        insta::assert_snapshot!(
            RepoError::not_found("Contoso").to_string(),
            @"Repository not found: Contoso"
        );
        insta::assert_snapshot!(
            RepoError::InvalidPriority { priority: 51 }.to_string(),
            @"Invalid priority 51: must be between 0 and 50"
        );
        insta::assert_snapshot!(
            RepoError::DuplicateName { name: "Local".into() }.to_string(),
            @"Repository already exists: Local"
        );
    }
}
