//! Ignore patterns for Go source trees.
//!
//! Directories the Go tool never treats as packages (`vendor`, `testdata`)
//! plus the usual VCS and tooling noise. Project `.gitignore` and
//! `.wirescopeignore` files are layered on top.

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// Default directories to always ignore
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    // Go tool conventions
    "vendor/",
    "testdata/",
    // Version control
    ".git/",
    ".svn/",
    ".hg/",
    // Other ecosystems sharing the repo
    "node_modules/",
    // Wirescope's own data
    ".wirescope/",
];

const PROJECT_IGNORE_FILES: &[&str] = &[".wirescopeignore", ".gitignore"];

/// Patterns for the ignore crate
pub struct IgnorePatterns {
    gitignore: Gitignore,
}

impl IgnorePatterns {
    /// Create ignore patterns from defaults, project ignore files and
    /// `extra_patterns`. Unparseable lines are skipped with a warning.
    pub fn new(root: &Path, extra_patterns: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new(root);

        let patterns = DEFAULT_IGNORE_DIRS
            .iter()
            .copied()
            .chain(extra_patterns.iter().map(String::as_str));
        for pattern in patterns {
            if let Err(e) = builder.add_line(None, pattern) {
                tracing::warn!(pattern, error = %e, "ignoring invalid ignore pattern");
            }
        }

        for name in PROJECT_IGNORE_FILES {
            let file = root.join(name);
            if file.is_file() {
                if let Some(e) = builder.add(&file) {
                    tracing::warn!(file = %file.display(), error = %e, "failed to read ignore file");
                }
            }
        }

        let gitignore = builder.build().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "invalid ignore rules, falling back to none");
            Gitignore::empty()
        });
        Self { gitignore }
    }

    /// Check if a root-relative path should be ignored. Directories whose
    /// name starts with `.` or `_` are always ignored, as by the Go tool.
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        if is_dir && is_hidden_package_dir(path) {
            return true;
        }
        self.gitignore
            .matched_path_or_any_parents(path, is_dir)
            .is_ignore()
    }
}

fn is_hidden_package_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.') || n.starts_with('_'))
}
