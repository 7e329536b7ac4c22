//! wirescope-core: shared foundation for the wirescope dependency resolver.
//!
//! - Errors: one `thiserror` enum per subsystem, aggregated by `PipelineError`
//! - Config: TOML-based, layered resolution (overrides > env > project > user > defaults)
//! - Tracing: `tracing` with an `EnvFilter` driven by `WIRESCOPE_LOG`
//! - Types: collection aliases shared by the analysis crate

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::{AnalysisConfig, ConfigOverrides, ScanConfig, WirescopeConfig};
pub use errors::{PipelineError, WirescopeErrorCode};
pub use types::SearchScope;
