//! Scanner module: parallel discovery and reading of Go sources.
//!
//! - `ignore` crate for gitignore-style pattern matching
//! - `rayon` for parallel reads
//! - `xxhash` for content hashing

pub mod hasher;
mod ignores;
mod types;
mod walker;

pub use ignores::{IgnorePatterns, DEFAULT_IGNORE_DIRS};
pub use types::{ScanResult, ScanStats, SourceFile};
pub use walker::GoScanner;
