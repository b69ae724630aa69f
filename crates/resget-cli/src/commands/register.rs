//! Register repositories

use clap::Args;
use resget_repo::{
    Authentication, DEFAULT_PRIORITY, PS_GALLERY_NAME, RegistrationRequest, Repository,
    RepositoryStore, is_reserved_name,
};
use std::path::PathBuf;

use super::{finish_batch, load_requests, report};
use crate::error::{CliError, Result};

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Repository name
    #[arg(
        required_unless_present_any = ["psgallery", "from"],
        conflicts_with_all = ["psgallery", "from"]
    )]
    pub name: Option<String>,

    /// Repository URL, or a local directory path
    #[arg(
        required_unless_present_any = ["psgallery", "from"],
        conflicts_with_all = ["psgallery", "from"]
    )]
    pub url: Option<String>,

    /// Register the PowerShell Gallery at its well-known URL
    #[arg(long, conflicts_with = "from")]
    pub psgallery: bool,

    /// Register every repository listed in a YAML file
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Search priority, 0 (searched first) to 50 (searched last)
    #[arg(
        long,
        default_value_t = DEFAULT_PRIORITY,
        value_parser = clap::value_parser!(u8).range(0..=50),
        conflicts_with = "from"
    )]
    pub priority: u8,

    /// Trust packages from this repository without prompting
    #[arg(long, conflicts_with = "from")]
    pub trusted: bool,

    /// Vault holding the repository credentials
    #[arg(long, requires = "secret", conflicts_with_all = ["psgallery", "from"])]
    pub vault_name: Option<String>,

    /// Secret name inside the vault
    #[arg(long, requires = "vault_name", conflicts_with_all = ["psgallery", "from"])]
    pub secret: Option<String>,

    /// Print the registered repositories
    #[arg(long)]
    pub passthru: bool,
}

pub fn run(store: &RepositoryStore, args: &RegisterArgs) -> Result<()> {
    if let Some(file) = &args.from {
        let requests: Vec<RegistrationRequest> = load_requests(file)?;
        tracing::debug!("Registering {} repositories from {}", requests.len(), file.display());
        let outcome = store.register_many(&requests)?;
        return finish_batch(outcome, "registered", args.passthru);
    }

    let registered = if args.psgallery {
        store.register_well_known(PS_GALLERY_NAME, args.priority, args.trusted)?
    } else {
        let (name, url) = match (&args.name, &args.url) {
            (Some(name), Some(url)) => (name, url),
            _ => return Err(CliError::input("A repository name and URL are required")),
        };
        if is_reserved_name(name) {
            return Err(CliError::validation_with_help(
                format!("Cannot register {} with a name and URL", PS_GALLERY_NAME),
                "Try: resget register --psgallery",
            ));
        }

        let mut repo = Repository::new(name.as_str(), url)?
            .with_priority(args.priority)
            .with_trusted(args.trusted);
        if args.vault_name.is_some() || args.secret.is_some() {
            repo = repo.with_authentication(Authentication::new(
                args.vault_name.as_deref(),
                args.secret.as_deref(),
            )?);
        }
        store.add(repo)?
    };

    if let Some(repo) = registered {
        report(&repo, "registered", args.passthru);
    }
    Ok(())
}
