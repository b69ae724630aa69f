//! Resget Repository Store
//!
//! This crate keeps the list of package repositories a user has
//! registered, in a single human-editable YAML file:
//!
//! - **Records**: name, URL, priority, trust flag and an optional
//!   vault/secret reference for credentials
//! - **Validation**: names, URL schemes, priority range and
//!   all-or-nothing authentication, checked on every write
//! - **Lookup**: exact or wildcard names, results sorted by priority
//!   then name
//! - **Well-known repositories**: the PowerShell Gallery is seeded on
//!   first use and its URL and authentication are fixed
//!
//! ## Example
//!
//! ```rust,no_run
//! use resget_repo::{Repository, RepositoryPatch, RepositoryStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RepositoryStore::from_env()?;
//! store.initialize()?;
//!
//! store.add(Repository::new("Internal", "https://nuget.example.com/v2")?.with_priority(10))?;
//! store.update("PSGallery", &RepositoryPatch::new().trusted(true))?;
//!
//! let found = store.read(&["*"])?;
//! for repo in &found.items {
//!     println!("{} {} {}", repo.priority, repo.name, repo.url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Notes
//!
//! - The store records where a secret lives, never the secret itself
//! - Writers in separate processes follow last-write-wins unless the
//!   advisory lock is enabled with [`StoreOptions::with_lock`]

pub mod error;
pub mod record;
pub mod policy;
pub mod wildcard;
pub mod config;
pub mod document;
pub mod lock;
pub mod gate;
pub mod store;
pub mod batch;

// Re-exports for convenience
pub use error::{RepoError, Result};
pub use record::{
    Authentication, Repository, RepositoryField, RepositoryPatch, DEFAULT_PRIORITY, MAX_PRIORITY,
    names_match, parse_url, validate_name, validate_priority, validate_url,
};
pub use policy::{PS_GALLERY_NAME, PS_GALLERY_URL, WellKnownRepository, is_reserved_name};
pub use wildcard::NamePattern;
pub use config::StoreOptions;
pub use document::{RepositoryEntry, StoreDocument};
pub use gate::{AlwaysProceed, ShouldProcess};
pub use store::RepositoryStore;
pub use batch::{AuthenticationRequest, BatchOutcome, RegistrationRequest, UpdateRequest};
