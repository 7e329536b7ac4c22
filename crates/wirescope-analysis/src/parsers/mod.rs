//! Go source parsing: tree-sitter-go syntax trees reduced to the `GoFile`
//! model used by the index and the collaborators.

pub mod build_constraint;
pub mod error_tolerant;
pub mod go;
pub mod types;

pub use go::GoParser;
pub use types::*;
