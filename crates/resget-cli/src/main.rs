//! Resget CLI - register and manage package repositories

use clap::{Parser, Subcommand};
use resget_repo::{RepositoryStore, StoreOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;
mod error;
mod exit_codes;
mod prompt;

use commands::register::RegisterArgs;
use commands::set::SetArgs;
use error::Result;

#[derive(Parser)]
#[command(name = "resget")]
#[command(author = "Resget Contributors")]
#[command(version)]
#[command(about = "Register and manage package repositories", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository store file
    #[arg(long, global = true, env = "RESGET_REPOSITORY_STORE", value_name = "PATH")]
    store: Option<PathBuf>,

    /// Hold an exclusive lock on the store while working
    #[arg(long, global = true)]
    lock: bool,

    /// Ask before every change to the store
    #[arg(long, global = true, conflicts_with = "what_if")]
    confirm: bool,

    /// Show what would change without changing anything
    #[arg(long, global = true)]
    what_if: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a repository
    Register(RegisterArgs),

    /// Change the URL, priority, trust or authentication of a repository
    Set(SetArgs),

    /// List registered repositories, optionally filtered by name or wildcard
    Get {
        /// Names or wildcard patterns (default: all)
        names: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Unregister repositories
    Unregister {
        /// Exact repository names
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let options = StoreOptions::resolve(cli.store)?;
    let lock = cli.lock || options.lock;
    let store = RepositoryStore::new(options.with_lock(lock));
    let store = if cli.what_if {
        store.with_gate(prompt::WhatIf)
    } else if cli.confirm {
        store.with_gate(prompt::ConfirmPrompt::new())
    } else {
        store
    };

    tracing::debug!("Using repository store {}", store.path().display());
    store.initialize()?;

    match cli.command {
        Commands::Register(args) => commands::register::run(&store, &args),
        Commands::Set(args) => commands::set::run(&store, &args),
        Commands::Get { names, json } => commands::get::run(&store, &names, json),
        Commands::Unregister { names } => commands::unregister::run(&store, &names),
    }
}
