//! Scanner configuration.

use serde::{Deserialize, Serialize};

/// Default maximum size of a Go source file that will be parsed (1 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// Configuration for the Go source scanner.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum file size in bytes. Default: 1 MiB.
    pub max_file_size: Option<u64>,
    /// Additional gitignore-style patterns to skip.
    #[serde(default)]
    pub extra_ignore: Vec<String>,
    /// Index `_test.go` files too. Default: false.
    pub include_tests: Option<bool>,
    /// Files whose build constraint requires one of these tags are left out
    /// of the index. Default: `["wireinject"]`.
    pub excluded_build_tags: Option<Vec<String>>,
    /// Worker threads for parallel reads. 0 or unset uses rayon's default.
    pub threads: Option<usize>,
}

impl ScanConfig {
    /// Returns the effective maximum file size, defaulting to 1 MiB.
    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE)
    }

    /// Returns whether `_test.go` files are indexed, defaulting to false.
    pub fn effective_include_tests(&self) -> bool {
        self.include_tests.unwrap_or(false)
    }

    /// Returns the excluded build tags, defaulting to `wireinject`.
    pub fn effective_excluded_build_tags(&self) -> Vec<String> {
        self.excluded_build_tags
            .clone()
            .unwrap_or_else(|| vec!["wireinject".to_string()])
    }

    /// Layers `other` on top; only values it sets win.
    pub(crate) fn merge_from(&mut self, other: ScanConfig) {
        self.max_file_size = other.max_file_size.or(self.max_file_size);
        self.include_tests = other.include_tests.or(self.include_tests);
        self.threads = other.threads.or(self.threads);
        if other.excluded_build_tags.is_some() {
            self.excluded_build_tags = other.excluded_build_tags;
        }
        if !other.extra_ignore.is_empty() {
            self.extra_ignore = other.extra_ignore;
        }
    }
}
