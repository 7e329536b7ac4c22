//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec sized for function parameter and result lists (usually <4).
pub type SmallVec4<T> = SmallVec<[T; 4]>;

/// SmallVec sized for injector result lists (usually <2).
pub type SmallVec2<T> = SmallVec<[T; 2]>;
