//! Root discovery: injectors are top-level functions whose body calls
//! `wire.Build(...)`; their named results are the root types.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use wirescope_core::config::analysis_config::DEFAULT_WIRE_IMPORT_PATH;
use wirescope_core::errors::DiscoveryError;

use crate::codebase::CodebaseIndex;
use crate::parsers::{FuncDecl, GoFile, GoParser, TypeExpr};

const BUILD_FUNC: &str = "Build";

/// A root type produced by an injector. `location` is empty for types of
/// the wire file's own package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RootTypeRef {
    pub location: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectorInfo {
    pub provider_name: String,
    /// Source text of each `wire.Build` argument.
    pub listed_providers: Vec<String>,
    pub returned_types: Vec<RootTypeRef>,
    pub line: u32,
}

/// A parsed wire declaration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireFile {
    pub package: String,
    pub injectors: Vec<InjectorInfo>,
}

impl WireFile {
    /// All root types in injector order.
    pub fn root_types(&self) -> impl Iterator<Item = &RootTypeRef> {
        self.injectors.iter().flat_map(|i| i.returned_types.iter())
    }
}

pub struct RootDiscoverer<'a> {
    wire_import_path: String,
    index: Option<&'a CodebaseIndex>,
}

impl<'a> RootDiscoverer<'a> {
    pub fn new(wire_import_path: impl Into<String>) -> Self {
        Self {
            wire_import_path: wire_import_path.into(),
            index: None,
        }
    }

    /// Resolve qualifiers against indexed package names instead of guessing
    /// from import paths.
    pub fn with_index(mut self, index: &'a CodebaseIndex) -> Self {
        self.index = Some(index);
        self
    }

    pub fn discover(&self, path: &Path) -> Result<WireFile, DiscoveryError> {
        let source = fs::read(path).map_err(|source| DiscoveryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.discover_source(&source, path)
    }

    pub fn discover_source(&self, source: &[u8], path: &Path) -> Result<WireFile, DiscoveryError> {
        let parse_failure = |message: String| DiscoveryError::Parse {
            path: path.to_path_buf(),
            message,
        };
        let mut parser = GoParser::new().map_err(|e| parse_failure(e.to_string()))?;
        let file = parser
            .parse(source, &path.to_string_lossy())
            .map_err(|e| parse_failure(e.to_string()))?;
        if file.has_errors() {
            return Err(DiscoveryError::Syntax {
                path: path.to_path_buf(),
                error_count: file.error_count,
                line: file.first_error_line.unwrap_or(1),
            });
        }

        let injectors = match self.wire_local_name(&file) {
            Some(wire) => file
                .functions
                .iter()
                .filter(|func| !func.is_method())
                .filter_map(|func| self.injector(&file, func, wire))
                .collect(),
            None => {
                tracing::debug!(path = %path.display(), import = %self.wire_import_path, "wire package not imported");
                Vec::new()
            }
        };
        tracing::debug!(path = %path.display(), injectors = injectors.len(), "wire file parsed");

        Ok(WireFile {
            package: file.package.clone(),
            injectors,
        })
    }

    fn wire_local_name<'f>(&self, file: &'f GoFile) -> Option<&'f str> {
        let import = file.imports.iter().find(|i| i.path == self.wire_import_path)?;
        match import.alias.as_deref() {
            Some("_") | Some(".") => None,
            Some(alias) => Some(alias),
            None => Some(import.default_local_name()),
        }
    }

    fn injector(&self, file: &GoFile, func: &FuncDecl, wire: &str) -> Option<InjectorInfo> {
        let build = func
            .calls
            .iter()
            .find(|call| call.callee == BUILD_FUNC && call.receiver.as_deref() == Some(wire))?;
        let returned_types = func
            .results
            .iter()
            .filter_map(|result| self.root_type(file, result))
            .collect();
        Some(InjectorInfo {
            provider_name: func.name.clone(),
            listed_providers: build.arguments.clone(),
            returned_types,
            line: func.line,
        })
    }

    fn root_type(&self, file: &GoFile, result: &TypeExpr) -> Option<RootTypeRef> {
        let (inner, _) = result.deref();
        let (qualifier, name) = inner.head_named()?;
        let location = match qualifier {
            None if name == "error" => return None,
            None => String::new(),
            Some(q) => self.resolve_qualifier(file, q),
        };
        Some(RootTypeRef {
            location,
            name: name.to_string(),
        })
    }

    fn resolve_qualifier(&self, file: &GoFile, qualifier: &str) -> String {
        if let Some(path) = self.index.and_then(|index| index.resolve_qualifier(file, qualifier)) {
            return path;
        }
        file.import_with_alias(qualifier)
            .or_else(|| {
                file.imports
                    .iter()
                    .find(|i| i.alias.is_none() && i.default_local_name() == qualifier)
            })
            .map(|i| i.path.clone())
            .unwrap_or_else(|| qualifier.to_string())
    }
}

impl Default for RootDiscoverer<'_> {
    fn default() -> Self {
        Self::new(DEFAULT_WIRE_IMPORT_PATH)
    }
}

/// Discover injectors in the wire file at `path`.
pub fn discover_roots(path: &Path, wire_import_path: &str) -> Result<Vec<InjectorInfo>, DiscoveryError> {
    RootDiscoverer::new(wire_import_path)
        .discover(path)
        .map(|wire| wire.injectors)
}
