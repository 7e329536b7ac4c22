//! Scanner types.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A Go source file read from disk.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Root-relative path, `/`-separated.
    pub rel_path: String,
    pub content: Vec<u8>,
}

impl SourceFile {
    /// Root-relative directory of the file, `""` for the root.
    pub fn rel_dir(&self) -> &str {
        self.rel_path
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("")
    }
}

/// Statistics about the scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Go files read
    pub total_files: usize,
    /// Bytes read
    pub total_bytes: u64,
    /// Directories skipped by ignore rules
    pub dirs_skipped: usize,
    /// Files skipped: too large, tests, ignored
    pub files_skipped: usize,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

/// Result of a scan operation
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub root: PathBuf,
    /// Files sorted by `rel_path`
    pub files: Vec<SourceFile>,
    pub stats: ScanStats,
    /// Non-fatal per-file errors
    pub errors: Vec<String>,
}

// Duration as milliseconds
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
