//! Codebase index: parsed Go files grouped into packages, with the lookups
//! the collaborators need (qualifier resolution, alias following, canonical
//! type rendering).

mod index;
mod lookup;
pub mod module;
mod package;

pub use index::CodebaseIndex;
pub use lookup::TypeTarget;
pub use module::GoModule;
pub use package::Package;
