//! wirescope-analysis: dependency tree resolution for Go codebases wired
//! with `google/wire`.
//!
//! Pipeline: scanner → Go parser → codebase index → root discovery →
//! dependency resolver → reporters / graph export.

pub mod analyzer;
pub mod builtin;
pub mod codebase;
pub mod extract;
pub mod graph;
pub mod parsers;
pub mod reporters;
pub mod resolver;
pub mod scanner;
pub mod wiring;

pub use analyzer::{WireAnalysis, WireAnalyzer};
pub use codebase::CodebaseIndex;
pub use resolver::{DependencyForest, DependencyResolver, FieldNode, InterfaceResolution, ResolvedType, SkipReason, TypeId, TypeKey};
