//! Type extraction and codebase lookup errors.

use super::error_code::{self, WirescopeErrorCode};

/// Errors raised by the type extractor, implementation finder and provider
/// finder when a lookup cannot be answered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("no packages found for path: {location}")]
    PackageNotFound { location: String },

    #[error("package {location} has errors: {error_count} syntax error(s) in {file}")]
    PackageHasErrors {
        location: String,
        file: String,
        error_count: u32,
    },

    #[error("type {name} not found in package {location}")]
    TypeNotFound { name: String, location: String },

    #[error("{name} is not a struct type")]
    NotAStruct { name: String },

    #[error("{name} is not an interface type")]
    NotAnInterface { name: String },

    #[error("alias cycle while resolving {name}")]
    AliasCycle { name: String },

    #[error("{0}")]
    Other(String),
}

impl WirescopeErrorCode for ExtractionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::PackageNotFound { .. } => error_code::PACKAGE_NOT_FOUND,
            Self::TypeNotFound { .. } => error_code::TYPE_NOT_FOUND,
            _ => error_code::EXTRACTION_ERROR,
        }
    }
}
