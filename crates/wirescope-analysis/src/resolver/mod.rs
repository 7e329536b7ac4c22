//! Dependency graph resolver: recursive, memoized, cycle-safe resolution of
//! a root type's field tree, with interface fields bound to their unique
//! implementation where one exists.

mod forest;
mod resolve;
mod types;

pub use forest::DependencyForest;
pub use resolve::DependencyResolver;
pub use types::{FieldNode, InterfaceResolution, ResolutionStatus, ResolvedType, SkipReason, TypeId, TypeKey};
