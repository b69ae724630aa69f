//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use resget_repo::RepoError;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Input rejected by validation or by the store's rules
    #[error("{message}")]
    #[diagnostic(code(resget::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The repository store itself failed
    #[error("{message}")]
    #[diagnostic(code(resget::cli::store))]
    Store {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Some items of a batch failed
    #[error("{failed} item(s) could not be processed")]
    #[diagnostic(code(resget::cli::partial))]
    PartialFailure { failed: usize },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(resget::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(resget::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Store { .. } => exit_codes::STORE_ERROR,
            CliError::PartialFailure { .. } => exit_codes::PARTIAL_FAILURE,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a validation error with help text
    pub fn validation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an input error (user provided invalid input)
    pub fn input(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: None,
        }
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        let message = err.to_string();
        match &err {
            RepoError::StoreCorrupt { path, .. } => CliError::Store {
                message,
                help: Some(format!(
                    "Fix the file by hand, or delete {} to recreate the default store",
                    path
                )),
            },
            e if e.is_fatal() => CliError::Store {
                message,
                help: None,
            },
            RepoError::NotFound { .. } => CliError::Validation {
                message,
                help: Some("Run 'resget get' to see all registered repositories".to_string()),
            },
            RepoError::DuplicateName { .. } => CliError::Validation {
                message,
                help: Some("Use 'resget set' to change an existing repository".to_string()),
            },
            RepoError::ReservedNameConflict { .. } => CliError::Validation {
                message,
                help: Some("Try: resget register --psgallery".to_string()),
            },
            _ => CliError::input(message),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
