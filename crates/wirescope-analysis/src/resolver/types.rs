//! Resolution result model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::extract::ProviderRef;

/// Handle of a `ResolvedType` in a `DependencyForest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cache key. The empty location is its own key space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeKey {
    pub location: String,
    pub name: String,
}

impl TypeKey {
    pub fn new(location: &str, name: &str) -> Self {
        Self {
            location: location.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.location, self.name)
        }
    }
}

/// Why a type or an interface binding could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    /// Fields of the type could not be extracted.
    ExtractionFailure { detail: String },
    /// No implementation of the interface was found.
    NoBinding,
    /// More than one implementation was found.
    AmbiguousBinding { count: usize },
    /// The unique implementation could not be resolved.
    RecursiveAnalysisFailure { detail: String },
    /// The implementation search itself failed.
    LookupFailure { detail: String },
}

impl SkipReason {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ExtractionFailure { .. } => "EXTRACTION_FAILURE",
            Self::NoBinding => "NO_BINDING",
            Self::AmbiguousBinding { .. } => "AMBIGUOUS_BINDING",
            Self::RecursiveAnalysisFailure { .. } => "RECURSIVE_ANALYSIS_FAILURE",
            Self::LookupFailure { .. } => "LOOKUP_FAILURE",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExtractionFailure { detail } => write!(f, "failed to analyze: {detail}"),
            Self::NoBinding => f.write_str("no implementing types found"),
            Self::AmbiguousBinding { count } => write!(f, "multiple implementing types found ({count})"),
            Self::RecursiveAnalysisFailure { detail } => {
                write!(f, "failed to analyze implementing type: {detail}")
            }
            Self::LookupFailure { detail } => write!(f, "failed to find interface references: {detail}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason")]
pub enum ResolutionStatus {
    Resolved,
    Skipped(SkipReason),
}

/// One resolved named type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedType {
    pub name: String,
    pub location: String,
    /// Functions constructing this type. Informational only.
    pub providers: Vec<ProviderRef>,
    /// Declaration order. Empty when skipped.
    pub fields: Vec<FieldNode>,
    pub status: ResolutionStatus,
}

impl ResolvedType {
    pub(crate) fn shell(key: &TypeKey) -> Self {
        Self {
            name: key.name.clone(),
            location: key.location.clone(),
            providers: Vec::new(),
            fields: Vec::new(),
            status: ResolutionStatus::Resolved,
        }
    }

    pub(crate) fn skipped(key: &TypeKey, reason: SkipReason) -> Self {
        Self {
            status: ResolutionStatus::Skipped(reason),
            ..Self::shell(key)
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, ResolutionStatus::Skipped(_))
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match &self.status {
            ResolutionStatus::Skipped(reason) => Some(reason),
            ResolutionStatus::Resolved => None,
        }
    }

    pub fn key(&self) -> TypeKey {
        TypeKey::new(&self.location, &self.name)
    }
}

/// A struct field in the dependency tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldNode {
    /// A named non-interface type, resolved recursively.
    Concrete { field_name: String, resolved: TypeId },
    Interface {
        field_name: String,
        interface_name: String,
        interface_location: String,
        is_pointer: bool,
        resolution: InterfaceResolution,
    },
    /// Predeclared or unnamed type; never expanded.
    Primitive {
        field_name: String,
        type_name: String,
        is_pointer: bool,
    },
}

impl FieldNode {
    pub fn field_name(&self) -> &str {
        match self {
            Self::Concrete { field_name, .. }
            | Self::Interface { field_name, .. }
            | Self::Primitive { field_name, .. } => field_name,
        }
    }

    /// The node this field leads to, if any.
    pub fn target(&self) -> Option<TypeId> {
        match self {
            Self::Concrete { resolved, .. } => Some(*resolved),
            Self::Interface {
                resolution: InterfaceResolution::ResolvedTo(id),
                ..
            } => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum InterfaceResolution {
    /// No lookup attempted: predeclared interfaces and interface literals.
    Unresolved,
    ResolvedTo(TypeId),
    Skipped(SkipReason),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_reason_messages() {
        assert_eq!(SkipReason::NoBinding.to_string(), "no implementing types found");
        assert_eq!(
            SkipReason::AmbiguousBinding { count: 2 }.to_string(),
            "multiple implementing types found (2)"
        );
        assert_eq!(
            SkipReason::RecursiveAnalysisFailure { detail: "boom".into() }.to_string(),
            "failed to analyze implementing type: boom"
        );
        assert_eq!(
            SkipReason::ExtractionFailure { detail: "boom".into() }.to_string(),
            "failed to analyze: boom"
        );
        assert_eq!(SkipReason::NoBinding.tag(), "NO_BINDING");
    }

    #[test]
    fn key_display() {
        assert_eq!(TypeKey::new("", "App").to_string(), "App");
        assert_eq!(TypeKey::new("example.com/svc", "S").to_string(), "example.com/svc.S");
    }
}
