//! `go.mod` handling.

use std::fs;
use std::path::Path;

pub const GO_MOD_FILE: &str = "go.mod";

/// The module rooted at the search root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoModule {
    /// Module path, empty when there is no `go.mod`.
    pub path: String,
}

impl GoModule {
    /// Read `go.mod` at `root`. A missing or unreadable file yields the
    /// empty module.
    pub fn load(root: &Path) -> Self {
        let go_mod = root.join(GO_MOD_FILE);
        match fs::read_to_string(&go_mod) {
            Ok(content) => Self {
                path: parse_module_path(&content).unwrap_or_default(),
            },
            Err(e) => {
                tracing::debug!(path = %go_mod.display(), error = %e, "no go.mod, keying packages by directory");
                Self::default()
            }
        }
    }

    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Import path of the package in root-relative `rel_dir` (`""` for the
    /// root). Without a module the directory itself is the key, `.` for the
    /// root.
    pub fn import_path_for(&self, rel_dir: &str) -> String {
        match (self.path.is_empty(), rel_dir.is_empty()) {
            (true, true) => ".".to_string(),
            (true, false) => rel_dir.to_string(),
            (false, true) => self.path.clone(),
            (false, false) => format!("{}/{}", self.path, rel_dir),
        }
    }
}

/// Extract the module path from `go.mod` content.
pub fn parse_module_path(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or("").trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}
