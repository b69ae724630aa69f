//! Unregister repositories

use resget_repo::RepositoryStore;

use super::fail_on_errors;
use crate::error::Result;

pub fn run(store: &RepositoryStore, names: &[String]) -> Result<()> {
    let errors = store.remove(names)?;
    tracing::debug!(
        "Unregister finished: {} requested, {} not found",
        names.len(),
        errors.len()
    );
    fail_on_errors(&errors)
}
