//! Change registered repositories

use clap::Args;
use resget_repo::{Authentication, RepositoryPatch, RepositoryStore, UpdateRequest, parse_url};
use std::path::PathBuf;

use super::{finish_batch, load_requests, report};
use crate::error::{CliError, Result};

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Name of the repository to change
    #[arg(required_unless_present = "from", conflicts_with = "from")]
    pub name: Option<String>,

    /// New repository URL, or a local directory path
    #[arg(long, conflicts_with = "from")]
    pub url: Option<String>,

    /// New search priority, 0 (searched first) to 50 (searched last)
    #[arg(
        long,
        value_parser = clap::value_parser!(u8).range(0..=50),
        conflicts_with = "from"
    )]
    pub priority: Option<u8>,

    /// Mark the repository trusted (true) or untrusted (false)
    #[arg(long, value_name = "BOOL", conflicts_with = "from")]
    pub trusted: Option<bool>,

    /// Vault holding the repository credentials
    #[arg(long, requires = "secret", conflicts_with = "from")]
    pub vault_name: Option<String>,

    /// Secret name inside the vault
    #[arg(long, requires = "vault_name", conflicts_with = "from")]
    pub secret: Option<String>,

    /// Apply every change listed in a YAML file
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Print the updated repositories
    #[arg(long)]
    pub passthru: bool,
}

impl SetArgs {
    fn patch(&self) -> Result<RepositoryPatch> {
        let mut patch = RepositoryPatch::new();
        if let Some(url) = &self.url {
            patch = patch.url(parse_url(url)?);
        }
        if let Some(priority) = self.priority {
            patch = patch.priority(priority);
        }
        if let Some(trusted) = self.trusted {
            patch = patch.trusted(trusted);
        }
        if self.vault_name.is_some() || self.secret.is_some() {
            patch = patch.authentication(Authentication::new(
                self.vault_name.as_deref(),
                self.secret.as_deref(),
            )?);
        }
        Ok(patch)
    }
}

pub fn run(store: &RepositoryStore, args: &SetArgs) -> Result<()> {
    if let Some(file) = &args.from {
        let requests: Vec<UpdateRequest> = load_requests(file)?;
        tracing::debug!("Updating {} repositories from {}", requests.len(), file.display());
        let outcome = store.update_many(&requests)?;
        return finish_batch(outcome, "updated", args.passthru);
    }

    let name = args
        .name
        .as_deref()
        .ok_or_else(|| CliError::input("A repository name is required"))?;
    if let Some(repo) = store.update(name, &args.patch()?)? {
        report(&repo, "updated", args.passthru);
    }
    Ok(())
}
