//! Collaborator seams. The resolver only sees these traits, so it can run
//! against the Go index or against in-memory fakes.

use wirescope_core::errors::ExtractionError;
use wirescope_core::SearchScope;

use super::types::{ExtractedType, ImplementationRef, ProviderRef};

/// Declared fields of a named struct type.
pub trait TypeExtractor {
    /// Pointer and alias indirection in field types is resolved; the field
    /// reports the pointed-to type with `is_pointer` set. `location` may be
    /// empty, meaning the root package.
    fn extract_fields(&self, location: &str, type_name: &str) -> Result<ExtractedType, ExtractionError>;
}

/// Concrete types implementing an interface.
pub trait ImplementationFinder {
    /// Results are ordered by location then type name.
    fn find_implementations(
        &self,
        interface_name: &str,
        interface_location: &str,
        scope: &SearchScope,
    ) -> Result<Vec<ImplementationRef>, ExtractionError>;
}

/// Functions constructing a type.
pub trait ProviderFinder {
    /// Top-level functions in scope with a result of exactly the given type
    /// (optionally behind one pointer).
    fn find_providers_returning(
        &self,
        type_name: &str,
        location: &str,
        scope: &SearchScope,
    ) -> Result<Vec<ProviderRef>, ExtractionError>;
}
