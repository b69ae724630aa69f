//! Confirmation gates for store mutations

use console::{Term, style};
use resget_repo::ShouldProcess;

/// Ask on the terminal before each change
pub struct ConfirmPrompt {
    term: Term,
}

impl ConfirmPrompt {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for ConfirmPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl ShouldProcess for ConfirmPrompt {
    fn should_process(&self, target: &str, action: &str) -> bool {
        let question = format!(
            "{} {} on target \"{}\". Continue? [y/N] ",
            style("?").yellow(),
            action,
            target
        );
        if self.term.write_str(&question).is_err() {
            return false;
        }
        match self.term.read_line() {
            Ok(answer) => is_yes(&answer),
            Err(e) => {
                tracing::debug!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

/// Describe each change without making it
pub struct WhatIf;

impl ShouldProcess for WhatIf {
    fn should_process(&self, target: &str, action: &str) -> bool {
        println!(
            "What if: Performing the operation \"{}\" on target \"{}\".",
            action, target
        );
        false
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES \n"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_what_if_never_proceeds() {
        assert!(!WhatIf.should_process("Local", "Register repository to repository store"));
    }
}
