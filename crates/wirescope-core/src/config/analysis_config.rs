//! Analysis configuration.

use serde::{Deserialize, Serialize};

/// Default search scope: every package below the search root.
pub const DEFAULT_SEARCH_SCOPE: &str = "./...";

/// Default import path of the wiring library whose `Build` call marks an injector.
pub const DEFAULT_WIRE_IMPORT_PATH: &str = "github.com/google/wire";

/// Configuration for the resolver and its collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Package patterns searched for interface implementations and providers.
    /// Default: `["./..."]`.
    #[serde(default)]
    pub search_scope: Vec<String>,
    /// Look up provider functions for every resolved type. Default: true.
    pub resolve_providers: Option<bool>,
    /// Import path of the wiring library. Default: `github.com/google/wire`.
    pub wire_import_path: Option<String>,
}

impl AnalysisConfig {
    /// Returns the effective search scope patterns, defaulting to `./...`.
    pub fn effective_search_scope(&self) -> Vec<String> {
        if self.search_scope.is_empty() {
            vec![DEFAULT_SEARCH_SCOPE.to_string()]
        } else {
            self.search_scope.clone()
        }
    }

    /// Returns whether providers are looked up, defaulting to true.
    pub fn effective_resolve_providers(&self) -> bool {
        self.resolve_providers.unwrap_or(true)
    }

    /// Returns the wiring library import path.
    pub fn effective_wire_import_path(&self) -> &str {
        self.wire_import_path
            .as_deref()
            .unwrap_or(DEFAULT_WIRE_IMPORT_PATH)
    }

    /// Layers `other` on top; only values it sets win.
    pub(crate) fn merge_from(&mut self, other: AnalysisConfig) {
        self.resolve_providers = other.resolve_providers.or(self.resolve_providers);
        if other.wire_import_path.is_some() {
            self.wire_import_path = other.wire_import_path;
        }
        if !other.search_scope.is_empty() {
            self.search_scope = other.search_scope;
        }
    }
}
