//! Type information collaborators consumed by the resolver, and their
//! implementations over the codebase index.

mod fields;
mod implementations;
mod method_set;
mod providers;
pub mod traits;
pub mod types;

pub use traits::{ImplementationFinder, ProviderFinder, TypeExtractor};
pub use types::{ExtractedField, ExtractedType, ImplementationRef, ProviderRef};
