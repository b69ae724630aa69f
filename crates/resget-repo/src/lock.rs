//! Advisory lock around store operations
//!
//! Off by default: concurrent writers to the same store file follow
//! last-write-wins. When enabled, every operation holds an exclusive
//! lock on `<store>.lock` until it returns.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{RepoError, Result};

/// Held lock; released on drop
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Path of the lock file guarding `store_path`
    pub fn lock_path(store_path: &Path) -> PathBuf {
        let mut name = store_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        store_path.with_file_name(name)
    }

    /// Block until the exclusive lock for `store_path` is acquired
    pub fn acquire(store_path: &Path) -> Result<Self> {
        let path = Self::lock_path(store_path);
        let failed = |e: std::io::Error| RepoError::StoreUnreadable {
            path: path.display().to_string(),
            message: format!("could not lock repository store: {}", e),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(failed)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(failed)?;
        file.lock_exclusive().map_err(failed)?;

        tracing::debug!("Acquired store lock {}", path.display());
        Ok(Self { file, path })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("Failed to release store lock {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_path() {
        assert_eq!(
            StoreLock::lock_path(Path::new("/data/resget/repositories.yaml")),
            PathBuf::from("/data/resget/repositories.yaml.lock")
        );
    }

    #[test]
    fn test_lock_released_on_drop() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = dir.path().join("repositories.yaml");

        let first = StoreLock::acquire(&store).unwrap();
        let probe = File::open(StoreLock::lock_path(&store)).unwrap();
        assert!(probe.try_lock_exclusive().is_err());
        drop(first);

        assert!(probe.try_lock_exclusive().is_ok());
        FileExt::unlock(&probe).unwrap();
    }
}
