//! Resolution algorithm.
//!
//! Depth-first and single-threaded. A type's shell is cached before its
//! fields are resolved, so a re-entrant request for the same key returns
//! the in-progress node and cyclic type graphs terminate. Extraction
//! failures are never cached.

use std::time::Instant;

use wirescope_core::errors::ExtractionError;
use wirescope_core::SearchScope;

use super::forest::DependencyForest;
use super::types::{FieldNode, InterfaceResolution, ResolvedType, SkipReason, TypeId, TypeKey};
use crate::builtin;
use crate::codebase::CodebaseIndex;
use crate::extract::{ExtractedField, ImplementationFinder, ProviderFinder, TypeExtractor};

pub struct DependencyResolver<'a> {
    extractor: &'a dyn TypeExtractor,
    implementations: &'a dyn ImplementationFinder,
    providers: &'a dyn ProviderFinder,
    scope: SearchScope,
    resolve_providers: bool,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(
        extractor: &'a dyn TypeExtractor,
        implementations: &'a dyn ImplementationFinder,
        providers: &'a dyn ProviderFinder,
        scope: SearchScope,
    ) -> Self {
        Self {
            extractor,
            implementations,
            providers,
            scope,
            resolve_providers: true,
        }
    }

    /// Resolver backed by a codebase index for all three collaborators.
    pub fn for_index(index: &'a CodebaseIndex, scope: SearchScope) -> Self {
        Self::new(index, index, index, scope)
    }

    /// Enable or disable provider lookup for resolved types.
    pub fn with_provider_lookup(mut self, enabled: bool) -> Self {
        self.resolve_providers = enabled;
        self
    }

    pub fn scope(&self) -> &SearchScope {
        &self.scope
    }

    /// Resolve every root in one run. The forest has one root entry per
    /// requested key, in order; a failing root is recorded as skipped.
    pub fn resolve_roots<I>(&self, roots: I) -> DependencyForest
    where
        I: IntoIterator<Item = TypeKey>,
    {
        let start = Instant::now();
        let mut forest = DependencyForest::new();
        for key in roots {
            let id = self.resolve(&mut forest, &key.location, &key.name);
            forest.add_root(id);
        }

        let skipped_roots = forest.root_types().filter(|t| t.is_skipped()).count();
        tracing::info!(
            roots = forest.roots().len(),
            skipped_roots,
            types = forest.cached_len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "dependency resolution complete"
        );
        forest
    }

    /// Resolve `(location, name)` into `forest`. Always yields a node: an
    /// extraction failure becomes an uncached skipped node.
    pub fn resolve(&self, forest: &mut DependencyForest, location: &str, name: &str) -> TypeId {
        match self.try_resolve(forest, location, name) {
            Ok(id) => id,
            Err(err) => {
                let key = TypeKey::new(location, name);
                let reason = SkipReason::ExtractionFailure {
                    detail: failure_detail(name, &err),
                };
                tracing::debug!(%key, reason = %reason, "type skipped");
                forest.push(ResolvedType::skipped(&key, reason))
            }
        }
    }

    fn try_resolve(
        &self,
        forest: &mut DependencyForest,
        location: &str,
        name: &str,
    ) -> Result<TypeId, ExtractionError> {
        let key = TypeKey::new(location, name);
        if let Some(id) = forest.lookup(&key) {
            tracing::trace!(%key, %id, "cache hit");
            return Ok(id);
        }

        let extracted = self.extractor.extract_fields(location, name)?;
        let id = forest.insert_cached(key.clone(), ResolvedType::shell(&key));
        tracing::debug!(%key, %id, fields = extracted.fields.len(), "resolving type");

        if self.resolve_providers {
            match self.providers.find_providers_returning(name, location, &self.scope) {
                Ok(providers) => forest.node_mut(id).providers = providers,
                Err(e) => tracing::debug!(%key, error = %e, "provider lookup failed"),
            }
        }

        for field in &extracted.fields {
            let node = self.classify(forest, field);
            forest.push_field(id, node);
        }
        Ok(id)
    }

    fn classify(&self, forest: &mut DependencyForest, field: &ExtractedField) -> FieldNode {
        let location = field.declared_location.as_str();
        let type_name = field.declared_type_name.as_str();

        if field.is_interface {
            // Predeclared interfaces and literals have nowhere to search from.
            let resolution = if location.is_empty() {
                InterfaceResolution::Unresolved
            } else {
                self.bind_interface(forest, type_name, location)
            };
            return FieldNode::Interface {
                field_name: field.name.clone(),
                interface_name: type_name.to_string(),
                interface_location: location.to_string(),
                is_pointer: field.is_pointer,
                resolution,
            };
        }

        if location.is_empty() || builtin::is_builtin(type_name) {
            return FieldNode::Primitive {
                field_name: field.name.clone(),
                type_name: type_name.to_string(),
                is_pointer: field.is_pointer,
            };
        }

        FieldNode::Concrete {
            field_name: field.name.clone(),
            resolved: self.resolve(forest, location, type_name),
        }
    }

    fn bind_interface(&self, forest: &mut DependencyForest, name: &str, location: &str) -> InterfaceResolution {
        let found = match self.implementations.find_implementations(name, location, &self.scope) {
            Ok(found) => found,
            Err(e) => {
                return InterfaceResolution::Skipped(SkipReason::LookupFailure {
                    detail: e.to_string(),
                })
            }
        };

        match found.as_slice() {
            [] => InterfaceResolution::Skipped(SkipReason::NoBinding),
            [only] => match self.try_resolve(forest, &only.location, &only.type_name) {
                Ok(id) => InterfaceResolution::ResolvedTo(id),
                Err(e) => InterfaceResolution::Skipped(SkipReason::RecursiveAnalysisFailure {
                    detail: failure_detail(&only.type_name, &e),
                }),
            },
            many => {
                tracing::debug!(
                    interface = name,
                    location,
                    count = many.len(),
                    "ambiguous interface binding"
                );
                InterfaceResolution::Skipped(SkipReason::AmbiguousBinding { count: many.len() })
            }
        }
    }
}

fn failure_detail(name: &str, err: &ExtractionError) -> String {
    format!("failed to extract struct fields for {name}: {err}")
}
