//! Search scope: which packages are searched for implementations and providers.
//!
//! Patterns follow the Go tool's package pattern syntax:
//! `./...` (every package below the root), `./svc/...` (a subtree),
//! `./svc` (one package), or import paths such as `example.com/app/...`.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

const WILDCARD: &str = "...";

/// One parsed package pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopePattern {
    /// Root-relative directory (`""` is the root itself), `/`-separated.
    Relative { dir: String, recursive: bool },
    /// Import path prefix (`""` with `recursive` matches everything).
    ImportPath { path: String, recursive: bool },
}

impl ScopePattern {
    /// Parse a single pattern.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidValue {
            field: "analysis.search_scope".to_string(),
            message: format!("{raw:?}: {message}"),
        };

        let pattern = raw.trim();
        if pattern.is_empty() {
            return Err(invalid("pattern is empty"));
        }
        if pattern.chars().any(char::is_whitespace) {
            return Err(invalid("pattern contains whitespace"));
        }
        if pattern.starts_with('/') {
            return Err(invalid("absolute paths are not supported"));
        }

        let (body, recursive) = match pattern.strip_suffix(WILDCARD) {
            Some(rest) => (rest.trim_end_matches('/'), true),
            None => (pattern, false),
        };
        if body.contains(WILDCARD) {
            return Err(invalid("`...` is only supported as the final element"));
        }

        if body == "." || body.starts_with("./") {
            let dir = body.trim_start_matches('.').trim_matches('/');
            if dir.split('/').any(|seg| seg == "..") {
                return Err(invalid("pattern escapes the search root"));
            }
            return Ok(Self::Relative {
                dir: dir.to_string(),
                recursive,
            });
        }
        if body.starts_with("..") {
            return Err(invalid("pattern escapes the search root"));
        }

        Ok(Self::ImportPath {
            path: body.trim_end_matches('/').to_string(),
            recursive,
        })
    }

    /// Whether a package at `rel_dir` (root-relative, `/`-separated, `""` for
    /// the root) with import path `import_path` is covered by this pattern.
    pub fn matches(&self, rel_dir: &str, import_path: &str) -> bool {
        match self {
            Self::Relative { dir, recursive } => prefix_match(dir, rel_dir, *recursive),
            Self::ImportPath { path, recursive } => prefix_match(path, import_path, *recursive),
        }
    }
}

fn prefix_match(prefix: &str, candidate: &str, recursive: bool) -> bool {
    if candidate == prefix {
        return true;
    }
    if !recursive {
        return false;
    }
    if prefix.is_empty() {
        return true;
    }
    candidate
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// A set of package patterns; a package is in scope when any pattern matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchScope {
    patterns: Vec<ScopePattern>,
}

impl SearchScope {
    /// Parse a list of patterns. An empty list is rejected.
    pub fn parse<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "analysis.search_scope".to_string(),
                message: "at least one pattern is required".to_string(),
            });
        }
        let patterns = patterns
            .iter()
            .map(|p| ScopePattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Scope covering every package below the search root.
    pub fn everything() -> Self {
        Self {
            patterns: vec![ScopePattern::Relative {
                dir: String::new(),
                recursive: true,
            }],
        }
    }

    pub fn patterns(&self) -> &[ScopePattern] {
        &self.patterns
    }

    /// Whether the package at `rel_dir` / `import_path` is searched.
    pub fn contains(&self, rel_dir: &str, import_path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(rel_dir, import_path))
    }
}

impl Default for SearchScope {
    fn default() -> Self {
        Self::everything()
    }
}
