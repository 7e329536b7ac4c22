//! Parser errors.

use std::path::PathBuf;

use super::error_code::{self, WirescopeErrorCode};

/// Errors that can occur while parsing a Go source file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Grammar could not be loaded: {message}")]
    GrammarLoad { message: String },

    #[error("Tree-sitter produced no tree for {path}")]
    NoTree { path: PathBuf },

    #[error("Source of {path} is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },

    #[error("Unsupported file: {path}")]
    UnsupportedFile { path: PathBuf },
}

impl WirescopeErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFile { .. } => error_code::UNSUPPORTED_FILE,
            _ => error_code::PARSE_ERROR,
        }
    }
}
