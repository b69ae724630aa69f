//! List registered repositories

use resget_repo::RepositoryStore;

use super::fail_on_errors;
use crate::display;
use crate::error::{CliError, Result};

pub fn run(store: &RepositoryStore, names: &[String], json: bool) -> Result<()> {
    let found = store.read(names)?;

    if json {
        display::print_json(&found.items).map_err(|e| CliError::internal(e.to_string()))?;
    } else if found.items.is_empty() {
        if found.errors.is_empty() {
            println!("No repositories found.");
        }
    } else {
        display::print_repositories(&found.items);
    }

    fail_on_errors(&found.errors)
}
