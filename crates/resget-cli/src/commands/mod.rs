//! CLI commands

pub mod register;
pub mod set;
pub mod get;
pub mod unregister;

use resget_repo::{BatchOutcome, Repository};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::display;
use crate::error::{CliError, Result};

/// Read a YAML list of requests for a batch command
fn load_requests<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| {
        CliError::validation_with_help(
            format!("Invalid request file {}: {}", path.display(), e),
            "Expected a YAML list of repository entries",
        )
    })
}

/// Report one successfully changed repository
fn report(repo: &Repository, verb: &str, passthru: bool) {
    if passthru {
        display::print_repositories(std::slice::from_ref(repo));
    } else {
        println!("\"{}\" has been {}", repo.name, verb);
    }
}

/// Report a batch: successes first, then per-item errors
fn finish_batch(outcome: BatchOutcome<Repository>, verb: &str, passthru: bool) -> Result<()> {
    if passthru {
        if !outcome.items.is_empty() {
            display::print_repositories(&outcome.items);
        }
    } else {
        for repo in &outcome.items {
            println!("\"{}\" has been {}", repo.name, verb);
        }
    }
    fail_on_errors(&outcome.errors)
}

/// Print per-item errors and turn them into a partial failure
fn fail_on_errors(errors: &[resget_repo::RepoError]) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    display::print_errors(errors);
    Err(CliError::PartialFailure {
        failed: errors.len(),
    })
}
