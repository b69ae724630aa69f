//! Integration tests for CLI commands

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to run resget against a store inside `dir`
fn resget(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_resget"))
        .arg("--store")
        .arg(store_path(dir))
        .args(args)
        .env_remove("RESGET_STORE_LOCK")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute resget")
}

fn store_path(dir: &Path) -> PathBuf {
    dir.join("store").join("repositories.yaml")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// `get --json` parsed into (name, priority) pairs, in output order
fn listed(dir: &Path) -> Vec<(String, u64)> {
    let output = resget(dir, &["get", "--json"]);
    assert!(output.status.success(), "get failed: {}", stderr(&output));
    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("Output should be valid JSON");
    json.as_array()
        .unwrap()
        .iter()
        .map(|r| {
            (
                r["name"].as_str().unwrap().to_string(),
                r["priority"].as_u64().unwrap(),
            )
        })
        .collect()
}

mod get_command {
    use super::*;

    #[test]
    fn test_fresh_store_has_gallery() {
        let dir = TempDir::new().unwrap();
        assert_eq!(listed(dir.path()), vec![("PSGallery".to_string(), 50)]);
        assert!(store_path(dir.path()).exists());
    }

    #[test]
    fn test_table_output() {
        let dir = TempDir::new().unwrap();
        let output = resget(dir.path(), &["get"]);
        assert!(output.status.success());
        let out = stdout(&output);
        assert!(out.contains("NAME"));
        assert!(out.contains("PSGallery"));
        assert!(out.contains("https://www.powershellgallery.com/api/v2"));
    }

    #[test]
    fn test_missing_exact_name_fails() {
        let dir = TempDir::new().unwrap();
        let output = resget(dir.path(), &["get", "NoSuchRepo"]);
        assert_eq!(output.status.code(), Some(4));
        assert!(stderr(&output).contains("Repository not found: NoSuchRepo"));
    }

    #[test]
    fn test_wildcard_miss_succeeds() {
        let dir = TempDir::new().unwrap();
        let output = resget(dir.path(), &["get", "Repo*"]);
        assert!(output.status.success());
        assert!(stdout(&output).contains("No repositories found."));
    }
}

mod register_command {
    use super::*;

    #[test]
    fn test_register_and_sort() {
        let dir = TempDir::new().unwrap();
        let output = resget(
            dir.path(),
            &["register", "Internal", "https://nuget.example.com/v2", "--priority", "10"],
        );
        assert!(output.status.success(), "{}", stderr(&output));
        assert!(stdout(&output).contains("\"Internal\" has been registered"));

        let local = dir.path().join("local-repo");
        fs::create_dir(&local).unwrap();
        let output = resget(
            dir.path(),
            &["register", "Local", local.to_str().unwrap(), "--priority", "10", "--trusted"],
        );
        assert!(output.status.success(), "{}", stderr(&output));

        assert_eq!(
            listed(dir.path()),
            vec![
                ("Internal".to_string(), 10),
                ("Local".to_string(), 10),
                ("PSGallery".to_string(), 50)
            ]
        );
    }

    #[test]
    fn test_register_duplicate_fails() {
        let dir = TempDir::new().unwrap();
        assert!(resget(dir.path(), &["register", "A", "https://a.example.com"]).status.success());
        let output = resget(dir.path(), &["register", "a", "https://b.example.com"]);
        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("already exists"));
    }

    #[test]
    fn test_register_gallery_name_rejected() {
        let dir = TempDir::new().unwrap();
        let output = resget(dir.path(), &["register", "psgallery", "https://mirror.example.com"]);
        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_register_bad_scheme_rejected() {
        let dir = TempDir::new().unwrap();
        let output = resget(dir.path(), &["register", "Oci", "oci://ghcr.io/org"]);
        assert_eq!(output.status.code(), Some(2));
        assert_eq!(listed(dir.path()).len(), 1);
    }

    #[test]
    fn test_register_from_file() {
        let dir = TempDir::new().unwrap();
        let requests = dir.path().join("repos.yaml");
        fs::write(
            &requests,
            "- name: Internal\n  url: https://nuget.example.com/v2\n  priority: 5\n\
             - name: NoUrl\n",
        )
        .unwrap();

        let output = resget(dir.path(), &["register", "--from", requests.to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(4));
        assert!(stdout(&output).contains("\"Internal\" has been registered"));
        assert!(stderr(&output).contains("must include a url"));
        assert_eq!(listed(dir.path())[0], ("Internal".to_string(), 5));
    }

    #[test]
    fn test_what_if_changes_nothing() {
        let dir = TempDir::new().unwrap();
        resget(dir.path(), &["get"]);
        let before = fs::read(store_path(dir.path())).unwrap();

        let output = resget(
            dir.path(),
            &["--what-if", "register", "Internal", "https://nuget.example.com/v2"],
        );
        assert!(output.status.success());
        assert!(stdout(&output).contains("What if:"));
        assert_eq!(fs::read(store_path(dir.path())).unwrap(), before);
    }
}

mod set_command {
    use super::*;

    #[test]
    fn test_set_gallery_priority() {
        let dir = TempDir::new().unwrap();
        let output = resget(dir.path(), &["set", "PSGallery", "--priority", "10", "--passthru"]);
        assert!(output.status.success(), "{}", stderr(&output));
        assert!(stdout(&output).contains("PSGallery"));
        assert_eq!(listed(dir.path()), vec![("PSGallery".to_string(), 10)]);
    }

    #[test]
    fn test_set_gallery_url_rejected() {
        let dir = TempDir::new().unwrap();
        let output = resget(dir.path(), &["set", "PSGallery", "--url", "http://example.com"]);
        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("pre-defined"));
    }

    #[test]
    fn test_set_nothing_rejected() {
        let dir = TempDir::new().unwrap();
        let output = resget(dir.path(), &["set", "PSGallery"]);
        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("Nothing to update"));
    }

    #[test]
    fn test_set_trusted_false() {
        let dir = TempDir::new().unwrap();
        assert!(
            resget(dir.path(), &["register", "A", "https://a.example.com", "--trusted"])
                .status
                .success()
        );
        let output = resget(dir.path(), &["set", "A", "--trusted", "false"]);
        assert!(output.status.success(), "{}", stderr(&output));

        let json: serde_json::Value =
            serde_json::from_str(&stdout(&resget(dir.path(), &["get", "A", "--json"]))).unwrap();
        assert_eq!(json[0]["trusted"], false);
    }
}

mod unregister_command {
    use super::*;

    #[test]
    fn test_unregister_partial() {
        let dir = TempDir::new().unwrap();
        assert!(resget(dir.path(), &["register", "A", "https://a.example.com"]).status.success());

        let output = resget(dir.path(), &["unregister", "A", "B"]);
        assert_eq!(output.status.code(), Some(4));
        let err = stderr(&output);
        assert!(err.contains("Repository not found: B"));
        assert!(!err.contains("Repository not found: A"));

        assert_eq!(listed(dir.path()), vec![("PSGallery".to_string(), 50)]);
    }

    #[test]
    fn test_corrupt_store_reported() {
        let dir = TempDir::new().unwrap();
        resget(dir.path(), &["get"]);
        fs::write(store_path(dir.path()), "repositories: [unclosed").unwrap();

        let output = resget(dir.path(), &["unregister", "PSGallery"]);
        assert_eq!(output.status.code(), Some(3));
        assert!(stderr(&output).contains("corrupted"));
    }
}
