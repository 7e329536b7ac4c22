//! Shared value types for wirescope.

pub mod collections;
pub mod scope;

pub use collections::{FxHashMap, FxHashSet};
pub use scope::{ScopePattern, SearchScope};
