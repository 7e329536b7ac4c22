//! Struct field extraction.

use wirescope_core::errors::ExtractionError;

use super::traits::TypeExtractor;
use super::types::{ExtractedField, ExtractedType};
use crate::builtin;
use crate::codebase::{CodebaseIndex, Package, TypeTarget};
use crate::parsers::{GoFile, StructField, TypeDecl, TypeDeclKind, TypeExpr};

impl TypeExtractor for CodebaseIndex {
    fn extract_fields(&self, location: &str, type_name: &str) -> Result<ExtractedType, ExtractionError> {
        if let Some(package) = self.package(location) {
            ensure_loadable(package)?;
        }
        let target = self.follow_aliases(location, type_name)?;
        let TypeTarget::Declared { package, file, decl, .. } = target else {
            return Err(ExtractionError::NotAStruct {
                name: type_name.to_string(),
            });
        };
        ensure_loadable(package)?;
        let TypeDeclKind::Struct(fields) = &decl.kind else {
            return Err(ExtractionError::NotAStruct {
                name: type_name.to_string(),
            });
        };

        let fields = fields
            .iter()
            .map(|field| self.describe_field(package, file, decl, field))
            .collect();
        tracing::trace!(location, type_name, "extracted struct fields");
        Ok(ExtractedType {
            type_name: type_name.to_string(),
            fields,
        })
    }
}

impl CodebaseIndex {
    fn describe_field(&self, package: &Package, file: &GoFile, owner: &TypeDecl, field: &StructField) -> ExtractedField {
        let (inner, is_pointer) = field.ty.deref();
        let mut described = match inner.head_named() {
            // Type parameters have no declaration of their own.
            Some((None, name)) if owner.is_type_param(name) => unnamed(&field.name, inner),
            Some((qualifier, name)) => {
                let location = self.locate_named(package, file, qualifier, name);
                self.describe_named(location, name)
            }
            None => unnamed(&field.name, inner),
        };
        described.name = field.name.clone();
        described.is_pointer |= is_pointer;
        described
    }

    fn describe_named(&self, location: String, name: &str) -> ExtractedField {
        if location.is_empty() {
            let mut field = ExtractedField::new("", name, "");
            field.is_interface = builtin::is_builtin_interface(name);
            return field;
        }
        match self.follow_aliases(&location, name) {
            Ok(TypeTarget::Declared {
                package,
                decl,
                pointer,
                ..
            }) => ExtractedField {
                name: String::new(),
                declared_type_name: decl.name.clone(),
                declared_location: package.import_path.clone(),
                is_pointer: pointer,
                is_interface: decl.is_interface(),
            },
            Ok(TypeTarget::Unnamed { expr, pointer }) => {
                let mut field = match expr.head_named() {
                    Some((None, builtin_name)) => self.describe_named(String::new(), builtin_name),
                    _ => unnamed("", expr),
                };
                field.is_pointer |= pointer;
                field
            }
            // Packages outside the index: only well-known interfaces are classified.
            Err(_) => {
                let mut field = ExtractedField::new("", name, &location);
                field.is_interface = builtin::known_interface_methods(&location, name).is_some();
                field
            }
        }
    }
}

/// Packages with syntax errors are refused, like a failed package load.
fn ensure_loadable(package: &Package) -> Result<(), ExtractionError> {
    match package.first_error_file() {
        Some(broken) => Err(ExtractionError::PackageHasErrors {
            location: package.import_path.clone(),
            file: broken.path.clone(),
            error_count: broken.error_count,
        }),
        None => Ok(()),
    }
}

fn unnamed(field_name: &str, ty: &TypeExpr) -> ExtractedField {
    let mut field = ExtractedField::new(field_name, &ty.to_string(), "");
    field.is_interface = matches!(ty, TypeExpr::Interface(_));
    field
}
