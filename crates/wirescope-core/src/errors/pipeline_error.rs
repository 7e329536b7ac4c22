//! Pipeline errors: aggregate of every error that can abort an analysis run.

use super::{ConfigError, DiscoveryError, ParseError, ScanError, WirescopeErrorCode};

/// Errors that abort a wire analysis run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),
}

impl WirescopeErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Scan(e) => e.error_code(),
            Self::Parse(e) => e.error_code(),
            Self::Discovery(e) => e.error_code(),
        }
    }
}
