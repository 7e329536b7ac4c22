//! The per-run arena of resolved types and its memoization cache.

use serde::Serialize;
use wirescope_core::types::FxHashMap;

use super::types::{FieldNode, ResolvedType, TypeId, TypeKey};

/// Result of one resolution run: every resolved type in an arena, the
/// cache mapping keys to arena entries, and the root handles in request
/// order. Types reached more than once share a single entry.
#[derive(Debug, Default, Serialize)]
pub struct DependencyForest {
    nodes: Vec<ResolvedType>,
    #[serde(skip)]
    cache: FxHashMap<TypeKey, TypeId>,
    roots: Vec<TypeId>,
}

impl DependencyForest {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// If `id` was not issued by this forest; use [`Self::try_get`] for
    /// ids of unknown origin.
    pub fn get(&self, id: TypeId) -> &ResolvedType {
        &self.nodes[id.index()]
    }

    pub fn try_get(&self, id: TypeId) -> Option<&ResolvedType> {
        self.nodes.get(id.index())
    }

    pub fn roots(&self) -> &[TypeId] {
        &self.roots
    }

    pub fn root_types(&self) -> impl Iterator<Item = &ResolvedType> {
        self.roots.iter().map(|id| self.get(*id))
    }

    pub fn nodes(&self) -> &[ResolvedType] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Handles with their nodes, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &ResolvedType)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (TypeId(i as u32), node))
    }

    /// Cached entry for `key`.
    pub fn lookup(&self, key: &TypeKey) -> Option<TypeId> {
        self.cache.get(key).copied()
    }

    /// Number of cached (successfully extracted) types.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Add a node without caching it.
    pub(crate) fn push(&mut self, node: ResolvedType) -> TypeId {
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Add a node and cache it under `key`.
    pub(crate) fn insert_cached(&mut self, key: TypeKey, node: ResolvedType) -> TypeId {
        let id = self.push(node);
        self.cache.insert(key, id);
        id
    }

    pub(crate) fn node_mut(&mut self, id: TypeId) -> &mut ResolvedType {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn push_field(&mut self, id: TypeId, field: FieldNode) {
        self.node_mut(id).fields.push(field);
    }

    pub(crate) fn add_root(&mut self, id: TypeId) {
        self.roots.push(id);
    }
}
