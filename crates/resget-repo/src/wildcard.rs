//! Repository name patterns
//!
//! Lookups accept either exact names or `*` wildcards, both
//! case-insensitive. Names may contain `?` and `[`, so those only act as
//! glob syntax inside a pattern that also has a `*`.

use glob::{MatchOptions, Pattern};

use crate::record::names_match;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A parsed name pattern
#[derive(Debug, Clone)]
pub enum NamePattern {
    /// Matches every name
    Any,
    /// Matches one name, ignoring case
    Exact(String),
    /// Glob pattern
    Glob { source: String, pattern: Pattern },
}

impl NamePattern {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed == "*" {
            return NamePattern::Any;
        }
        if !trimmed.contains('*') {
            return NamePattern::Exact(trimmed.to_string());
        }
        match Pattern::new(trimmed) {
            Ok(pattern) => NamePattern::Glob {
                source: trimmed.to_string(),
                pattern,
            },
            // Unbalanced brackets and the like: fall back to a literal match
            Err(_) => NamePattern::Exact(trimmed.to_string()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Any => true,
            NamePattern::Exact(expected) => names_match(expected, name),
            NamePattern::Glob { source, pattern } => {
                pattern.matches_with(name.trim(), MATCH_OPTIONS) || names_match(source, name)
            }
        }
    }

    /// Whether a miss on this pattern goes unreported
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, NamePattern::Exact(_))
    }

    /// The pattern as the caller wrote it (trimmed)
    pub fn as_str(&self) -> &str {
        match self {
            NamePattern::Any => "*",
            NamePattern::Exact(name) => name,
            NamePattern::Glob { source, .. } => source,
        }
    }
}

/// True when a name list selects every repository: empty, or just `*`
pub fn selects_all<S: AsRef<str>>(names: &[S]) -> bool {
    match names {
        [] => true,
        [only] => only.as_ref().trim() == "*",
        _ => false,
    }
}
