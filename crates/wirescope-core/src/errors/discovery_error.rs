//! Wire declaration (root discovery) errors.

use std::path::PathBuf;

use super::error_code::{self, WirescopeErrorCode};

/// Errors that prevent root types from being discovered. These are the only
/// errors that abort a whole analysis run.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("failed to read wire file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse wire file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("wire file {path} has {error_count} syntax error(s), first at line {line}")]
    Syntax {
        path: PathBuf,
        error_count: u32,
        line: u32,
    },
}

impl WirescopeErrorCode for DiscoveryError {
    fn error_code(&self) -> &'static str {
        error_code::DISCOVERY_ERROR
    }
}
