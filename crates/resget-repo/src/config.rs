//! Store location and options
//!
//! The store lives in `<local data dir>/resget/repositories.yaml` unless
//! `RESGET_REPOSITORY_STORE` points elsewhere.

use std::path::{Path, PathBuf};

use crate::error::{RepoError, Result};

/// Environment variable overriding the store path
pub const STORE_PATH_ENV: &str = "RESGET_REPOSITORY_STORE";

/// Environment variable enabling the advisory store lock
pub const STORE_LOCK_ENV: &str = "RESGET_STORE_LOCK";

/// File name of the store inside the data directory
pub const STORE_FILE_NAME: &str = "repositories.yaml";

/// How a [`crate::RepositoryStore`] finds and guards its file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Store file path
    pub path: PathBuf,

    /// Hold an exclusive advisory lock for each operation
    pub lock: bool,
}

impl StoreOptions {
    /// Options for a store at `path`, without locking
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: false,
        }
    }

    /// Resolve options from the environment, falling back to the default path
    pub fn from_env() -> Result<Self> {
        Self::resolve(None)
    }

    /// Resolve options, preferring an explicit path over the environment
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        let from_env = || std::env::var_os(STORE_PATH_ENV).filter(|v| !v.is_empty());
        let path = match explicit.or_else(|| from_env().map(PathBuf::from)) {
            Some(path) => path,
            None => Self::default_path()?,
        };
        let lock = std::env::var(STORE_LOCK_ENV)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        Ok(Self { path, lock })
    }

    /// Default store path for the current user
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir().ok_or_else(|| RepoError::InvalidConfig {
            message: "Could not determine local data directory".to_string(),
        })?;
        Ok(data_dir.join("resget").join(STORE_FILE_NAME))
    }

    pub fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
