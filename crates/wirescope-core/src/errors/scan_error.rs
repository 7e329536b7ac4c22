//! Scanner errors.

use std::path::PathBuf;

use super::error_code::{self, WirescopeErrorCode};

/// Errors that abort a scan. Per-file failures are collected, not raised.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Search root not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Search root is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WirescopeErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        error_code::SCAN_ERROR
    }
}
