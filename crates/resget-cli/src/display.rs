//! Display formatting for CLI output

use console::style;
use resget_repo::{RepoError, Repository};

/// Print repositories as an aligned table
pub fn print_repositories(repos: &[Repository]) {
    let name_width = repos
        .iter()
        .map(|r| r.name.len())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(4);
    let url_width = repos
        .iter()
        .map(|r| r.url.as_str().len())
        .chain(std::iter::once("URL".len()))
        .max()
        .unwrap_or(3);

    println!(
        "{}",
        style(format!(
            "{:<name_width$}  {:<url_width$}  {:<7}  {:>8}  {}",
            "NAME", "URL", "TRUSTED", "PRIORITY", "AUTHENTICATION"
        ))
        .bold()
    );

    for repo in repos {
        let auth = repo
            .authentication
            .as_ref()
            .map(|a| format!("{}/{}", a.vault_name, a.secret))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<name_width$}  {:<url_width$}  {:<7}  {:>8}  {}",
            repo.name,
            repo.url.as_str(),
            repo.trusted,
            repo.priority,
            auth
        );
    }
}

/// Print repositories as pretty JSON
pub fn print_json(repos: &[Repository]) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(repos)?);
    Ok(())
}

/// Print per-item errors to stderr
pub fn print_errors(errors: &[RepoError]) {
    for error in errors {
        eprintln!("{} {}", style("error:").red().bold(), error);
    }
}
