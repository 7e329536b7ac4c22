//! Top-level wirescope configuration with layered resolution.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, ScanConfig};
use crate::errors::ConfigError;
use crate::types::SearchScope;

/// Name of the project-level config file looked up in the search root.
pub const PROJECT_CONFIG_FILE: &str = "wirescope.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (applied via `apply_overrides`)
/// 2. Environment variables (`WIRESCOPE_*`)
/// 3. Project config (`wirescope.toml` in the search root)
/// 4. User config (`~/.wirescope/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WirescopeConfig {
    pub scan: ScanConfig,
    pub analysis: AnalysisConfig,
}

/// Overrides supplied by an embedding tool; highest priority layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub scan_max_file_size: Option<u64>,
    pub scan_include_tests: Option<bool>,
    pub search_scope: Option<Vec<String>>,
    pub resolve_providers: Option<bool>,
}

impl WirescopeConfig {
    /// Load configuration for the codebase rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(e) => {
                        ::tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &WirescopeConfig) -> Result<(), ConfigError> {
        if config.scan.max_file_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "scan.max_file_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(tags) = &config.scan.excluded_build_tags {
            if tags.iter().any(|t| t.trim().is_empty()) {
                return Err(ConfigError::ValidationFailed {
                    field: "scan.excluded_build_tags".to_string(),
                    message: "tags must not be empty".to_string(),
                });
            }
        }
        SearchScope::parse(config.analysis.effective_search_scope().as_slice())?;
        Ok(())
    }

    /// The search scope described by `analysis.search_scope`.
    pub fn search_scope(&self) -> Result<SearchScope, ConfigError> {
        SearchScope::parse(self.analysis.effective_search_scope().as_slice())
    }

    /// Returns the user config path: `~/.wirescope/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".wirescope").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut WirescopeConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: WirescopeConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        config.scan.merge_from(file_config.scan);
        config.analysis.merge_from(file_config.analysis);
        Ok(())
    }

    /// Environment layer: `WIRESCOPE_<SECTION>_<KEY>`. Unparseable values
    /// are ignored.
    fn apply_env_overrides(config: &mut WirescopeConfig) {
        if let Some(v) = env_value("WIRESCOPE_SCAN_MAX_FILE_SIZE") {
            config.scan.max_file_size = Some(v);
        }
        if let Some(v) = env_value("WIRESCOPE_SCAN_INCLUDE_TESTS") {
            config.scan.include_tests = Some(v);
        }
        if let Some(raw) = env_value::<String>("WIRESCOPE_ANALYSIS_SEARCH_SCOPE") {
            // Space or comma separated, like `go list` patterns.
            let patterns: Vec<String> = raw
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if !patterns.is_empty() {
                config.analysis.search_scope = patterns;
            }
        }
        if let Some(v) = env_value("WIRESCOPE_ANALYSIS_RESOLVE_PROVIDERS") {
            config.analysis.resolve_providers = Some(v);
        }
    }

    fn apply_overrides(config: &mut WirescopeConfig, overrides: &ConfigOverrides) {
        config.scan.max_file_size = overrides.scan_max_file_size.or(config.scan.max_file_size);
        config.scan.include_tests = overrides.scan_include_tests.or(config.scan.include_tests);
        config.analysis.resolve_providers = overrides.resolve_providers.or(config.analysis.resolve_providers);
        if let Some(scope) = &overrides.search_scope {
            config.analysis.search_scope.clone_from(scope);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_value<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok()?.trim().parse().ok()
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
