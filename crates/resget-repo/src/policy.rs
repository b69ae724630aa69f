//! Well-known repositories
//!
//! A well-known repository has a fixed URL and a set of fields callers
//! may never change. Its name is reserved: it can only be registered
//! through [`crate::RepositoryStore::register_well_known`], and seeded
//! entries are created when the store file is first initialized.

use url::Url;

use crate::error::{RepoError, Result};
use crate::record::{DEFAULT_PRIORITY, Repository, RepositoryField, names_match};

/// Name of the public PowerShell Gallery
pub const PS_GALLERY_NAME: &str = "PSGallery";

/// Fixed location of the public PowerShell Gallery
pub const PS_GALLERY_URL: &str = "https://www.powershellgallery.com/api/v2";

/// A built-in repository definition
#[derive(Debug, Clone, Copy)]
pub struct WellKnownRepository {
    pub name: &'static str,
    pub url: &'static str,
    /// Fields no caller may set once registered
    pub protected: &'static [RepositoryField],
    /// Created automatically by store initialization
    pub seeded: bool,
}

/// Every well-known repository
pub const WELL_KNOWN: &[WellKnownRepository] = &[WellKnownRepository {
    name: PS_GALLERY_NAME,
    url: PS_GALLERY_URL,
    protected: &[RepositoryField::Url, RepositoryField::Authentication],
    seeded: true,
}];

impl WellKnownRepository {
    /// Whether `field` is fixed for this repository
    pub fn protects(&self, field: RepositoryField) -> bool {
        self.protected.contains(&field)
    }

    /// Build the record for this repository
    pub fn to_repository(&self, priority: u8, trusted: bool) -> Result<Repository> {
        let url = Url::parse(self.url).map_err(|e| RepoError::invalid_url(self.url, e.to_string()))?;
        Ok(Repository {
            name: self.name.to_string(),
            url,
            priority,
            trusted,
            authentication: None,
        })
    }

    /// The record created when the store is seeded
    pub fn seed(&self) -> Result<Repository> {
        self.to_repository(DEFAULT_PRIORITY, false)
    }

    /// Reject a change to any protected field
    pub fn check_fields(&self, fields: &[RepositoryField]) -> Result<()> {
        match fields.iter().find(|f| self.protects(**f)) {
            Some(field) => Err(RepoError::ReservedNameConflict {
                name: self.name.to_string(),
                message: format!(
                    "the {} of this repository is pre-defined and cannot be set; \
                     re-register it with the well-known registration instead",
                    field
                ),
            }),
            None => Ok(()),
        }
    }
}

/// Look up a well-known repository by name (case-insensitive)
pub fn well_known(name: &str) -> Option<&'static WellKnownRepository> {
    WELL_KNOWN.iter().find(|w| names_match(w.name, name))
}

/// Whether `name` is reserved for a well-known repository
pub fn is_reserved_name(name: &str) -> bool {
    well_known(name).is_some()
}

/// Well-known repositories created on first initialization
pub fn seeded() -> impl Iterator<Item = &'static WellKnownRepository> {
    WELL_KNOWN.iter().filter(|w| w.seeded)
}
