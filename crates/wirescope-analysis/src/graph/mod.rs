//! Graph view of a resolution forest (petgraph), for cycle detection and
//! reachability queries.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef};
use serde::{Deserialize, Serialize};

use crate::resolver::{DependencyForest, FieldNode, InterfaceResolution, TypeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// A concrete field's type.
    Field,
    /// An interface field bound to its implementation.
    Binding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub field_name: String,
    pub kind: EdgeKind,
}

/// One node per arena entry, node index equal to the `TypeId`.
pub struct DependencyGraph {
    graph: DiGraph<TypeId, DependencyEdge>,
}

impl DependencyGraph {
    pub fn from_forest(forest: &DependencyForest) -> Self {
        let mut graph = DiGraph::with_capacity(forest.len(), forest.len());
        for (id, _) in forest.iter() {
            graph.add_node(id);
        }
        for (id, node) in forest.iter() {
            for field in &node.fields {
                let (target, kind) = match field {
                    FieldNode::Concrete { resolved, .. } => (*resolved, EdgeKind::Field),
                    FieldNode::Interface {
                        resolution: InterfaceResolution::ResolvedTo(target),
                        ..
                    } => (*target, EdgeKind::Binding),
                    _ => continue,
                };
                graph.add_edge(
                    node_index(id),
                    node_index(target),
                    DependencyEdge {
                        field_name: field.field_name().to_string(),
                        kind,
                    },
                );
            }
        }
        Self { graph }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: TypeId) -> bool {
        id.index() < self.graph.node_count()
    }

    /// Direct dependencies of `id` with their edges. Empty for an id not in
    /// the graph.
    pub fn dependencies(&self, id: TypeId) -> Vec<(TypeId, &DependencyEdge)> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut deps: Vec<(TypeId, &DependencyEdge)> = self
            .graph
            .edges(node_index(id))
            .map(|e| (self.graph[e.target()], e.weight()))
            .collect();
        deps.sort_by_key(|(target, edge)| (*target, edge.field_name.clone()));
        deps
    }

    /// Every type reachable from `id`, `id` included. Empty for an id not
    /// in the graph.
    pub fn reachable_from(&self, id: TypeId) -> Vec<TypeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut dfs = Dfs::new(&self.graph, node_index(id));
        let mut reached = Vec::new();
        while let Some(node) = dfs.next(&self.graph) {
            reached.push(self.graph[node]);
        }
        reached.sort();
        reached
    }

    /// Strongly connected components forming cycles: more than one node, or
    /// a single node with a self-loop. Each component is sorted, components
    /// are ordered by their first member.
    pub fn cycles(&self) -> Vec<Vec<TypeId>> {
        let mut cycles: Vec<Vec<TypeId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| match scc.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|scc| {
                let mut ids: Vec<TypeId> = scc.into_iter().map(|n| self.graph[n]).collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }
}

fn node_index(id: TypeId) -> NodeIndex {
    NodeIndex::new(id.index())
}
