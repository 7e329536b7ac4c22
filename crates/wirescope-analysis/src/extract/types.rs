//! Values exchanged between the resolver and its collaborators.

use serde::{Deserialize, Serialize};

/// The declared fields of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedType {
    pub type_name: String,
    /// Declaration order.
    pub fields: Vec<ExtractedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub name: String,
    /// Base identifier of a named type, or Go source text of an unnamed one.
    pub declared_type_name: String,
    /// Import path of the defining package; empty for predeclared and
    /// unnamed types.
    pub declared_location: String,
    pub is_pointer: bool,
    pub is_interface: bool,
}

impl ExtractedField {
    pub fn new(name: &str, type_name: &str, location: &str) -> Self {
        Self {
            name: name.to_string(),
            declared_type_name: type_name.to_string(),
            declared_location: location.to_string(),
            is_pointer: false,
            is_interface: false,
        }
    }

    pub fn pointer(mut self) -> Self {
        self.is_pointer = true;
        self
    }

    pub fn interface(mut self) -> Self {
        self.is_interface = true;
        self
    }
}

/// A concrete type implementing an interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImplementationRef {
    pub location: String,
    pub type_name: String,
}

/// A function returning a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProviderRef {
    pub location: String,
    pub name: String,
}
