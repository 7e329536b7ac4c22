//! End-to-end wire analysis: index the codebase, discover injector roots in
//! a wire file, resolve them all in one run.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::instrument;
use wirescope_core::errors::PipelineError;
use wirescope_core::WirescopeConfig;

use crate::codebase::CodebaseIndex;
use crate::resolver::{DependencyForest, DependencyResolver, TypeKey};
use crate::scanner::ScanStats;
use crate::wiring::{InjectorInfo, RootDiscoverer};

/// Result of analyzing one wire file.
#[derive(Debug, Serialize)]
pub struct WireAnalysis {
    pub forest: DependencyForest,
    pub injectors: Vec<InjectorInfo>,
    pub stats: ScanStats,
    /// Non-fatal scan and parse errors.
    pub errors: Vec<String>,
}

pub struct WireAnalyzer {
    root: PathBuf,
    config: WirescopeConfig,
}

impl WireAnalyzer {
    pub fn new(root: impl Into<PathBuf>, config: WirescopeConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Load configuration for `root` (project, user, env) and build an
    /// analyzer.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, PipelineError> {
        let root = root.into();
        let config = WirescopeConfig::load(&root, None)?;
        Ok(Self::new(root, config))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &WirescopeConfig {
        &self.config
    }

    /// Index the codebase below the analyzer root.
    pub fn build_index(&self) -> Result<CodebaseIndex, PipelineError> {
        CodebaseIndex::build(&self.root, &self.config)
    }

    /// Resolve every root type produced by the injectors in `wire_file`.
    /// Only a root discovery failure aborts; per-type failures are recorded
    /// in the forest.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn analyze_wire_file(&self, wire_file: &Path) -> Result<WireAnalysis, PipelineError> {
        let index = self.build_index()?;
        let wire_path = self.locate(wire_file);
        let wire = RootDiscoverer::new(self.config.analysis.effective_wire_import_path())
            .with_index(&index)
            .discover(&wire_path)?;

        let own_location = self.wire_package_location(&index, &wire_path);
        let roots: Vec<TypeKey> = wire
            .root_types()
            .map(|root| {
                let location = if root.location.is_empty() {
                    own_location.as_str()
                } else {
                    root.location.as_str()
                };
                TypeKey::new(location, &root.name)
            })
            .collect();
        tracing::info!(
            wire_file = %wire_path.display(),
            injectors = wire.injectors.len(),
            roots = roots.len(),
            "roots discovered"
        );

        let forest = self.resolve(&index, roots)?;
        Ok(WireAnalysis {
            forest,
            injectors: wire.injectors,
            stats: index.stats().clone(),
            errors: index.errors().to_vec(),
        })
    }

    /// Resolve explicit root types without a wire file.
    pub fn analyze_types(&self, roots: Vec<TypeKey>) -> Result<DependencyForest, PipelineError> {
        let index = self.build_index()?;
        self.resolve(&index, roots)
    }

    fn resolve(&self, index: &CodebaseIndex, roots: Vec<TypeKey>) -> Result<DependencyForest, PipelineError> {
        let scope = self.config.search_scope()?;
        let resolver = DependencyResolver::for_index(index, scope)
            .with_provider_lookup(self.config.analysis.effective_resolve_providers());
        Ok(resolver.resolve_roots(roots))
    }

    /// Relative wire paths are tried as given, then below the root.
    fn locate(&self, wire_file: &Path) -> PathBuf {
        if wire_file.is_absolute() || wire_file.exists() {
            wire_file.to_path_buf()
        } else {
            self.root.join(wire_file)
        }
    }

    /// Location for unqualified root types: empty when the wire file sits in
    /// the root package, its package import path otherwise.
    fn wire_package_location(&self, index: &CodebaseIndex, wire_path: &Path) -> String {
        let dir = wire_path.parent().unwrap_or(Path::new(""));
        let relative = match (dir.canonicalize(), self.root.canonicalize()) {
            (Ok(dir), Ok(root)) => dir.strip_prefix(&root).map(Path::to_path_buf).ok(),
            _ => dir.strip_prefix(&self.root).map(Path::to_path_buf).ok(),
        };
        let rel_dir = relative
            .map(|r| {
                r.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default();
        if rel_dir.is_empty() {
            String::new()
        } else {
            index.module().import_path_for(&rel_dir)
        }
    }
}
