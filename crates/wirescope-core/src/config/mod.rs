//! Configuration system for wirescope.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod analysis_config;
pub mod scan_config;
pub mod wirescope_config;

pub use analysis_config::AnalysisConfig;
pub use scan_config::ScanConfig;
pub use wirescope_config::{ConfigOverrides, WirescopeConfig};
