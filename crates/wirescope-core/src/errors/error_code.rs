//! Stable error codes shared by every error enum.

/// Every error enum implements this to expose a machine-readable code
/// alongside its human-readable message.
pub trait WirescopeErrorCode {
    /// Returns the stable error code string (e.g., "SCAN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn tagged_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const UNSUPPORTED_FILE: &str = "UNSUPPORTED_FILE";
pub const PACKAGE_NOT_FOUND: &str = "PACKAGE_NOT_FOUND";
pub const TYPE_NOT_FOUND: &str = "TYPE_NOT_FOUND";
pub const EXTRACTION_ERROR: &str = "EXTRACTION_ERROR";
pub const DISCOVERY_ERROR: &str = "DISCOVERY_ERROR";
