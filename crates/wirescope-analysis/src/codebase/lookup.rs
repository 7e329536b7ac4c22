//! Name resolution over the index: qualifiers to import paths, alias
//! chains to their targets, and canonical type rendering.

use wirescope_core::errors::ExtractionError;
use wirescope_core::types::FxHashSet;

use super::index::CodebaseIndex;
use super::package::Package;
use crate::builtin;
use crate::parsers::{GoFile, TypeDecl, TypeDeclKind, TypeExpr};

/// Where a named type ends up after following aliases.
#[derive(Debug, Clone, Copy)]
pub enum TypeTarget<'a> {
    /// A non-alias declaration in an indexed package.
    Declared {
        package: &'a Package,
        file: &'a GoFile,
        decl: &'a TypeDecl,
        /// An alias in the chain added a pointer layer.
        pointer: bool,
    },
    /// An alias whose target is predeclared or unnamed (`type ID = string`,
    /// `type Fn = func()`).
    Unnamed {
        expr: &'a TypeExpr,
        pointer: bool,
    },
}

impl<'a> TypeTarget<'a> {
    pub fn pointer(&self) -> bool {
        match self {
            TypeTarget::Declared { pointer, .. } | TypeTarget::Unnamed { pointer, .. } => *pointer,
        }
    }
}

const MAX_ALIAS_DEPTH: usize = 32;

impl CodebaseIndex {
    /// Import path bound to `qualifier` in `file`: an explicit alias, an
    /// indexed package with that name, or the import path's last element.
    pub fn resolve_qualifier(&self, file: &GoFile, qualifier: &str) -> Option<String> {
        if let Some(import) = file.import_with_alias(qualifier) {
            return Some(import.path.clone());
        }
        let unaliased = || file.imports.iter().filter(|i| i.alias.is_none());
        unaliased()
            .find(|i| self.package(&i.path).is_some_and(|p| p.name == qualifier))
            .or_else(|| unaliased().find(|i| i.default_local_name() == qualifier))
            .map(|i| i.path.clone())
    }

    /// Defining location of the named type `qualifier.name` as written in
    /// `file` of `package`. Predeclared types have the empty location.
    pub fn locate_named(&self, package: &Package, file: &GoFile, qualifier: Option<&str>, name: &str) -> String {
        if let Some(q) = qualifier {
            return self
                .resolve_qualifier(file, q)
                .unwrap_or_else(|| q.to_string());
        }
        if package.type_decl(name).is_some() {
            return package.import_path.clone();
        }
        if builtin::is_builtin(name) {
            return String::new();
        }
        file.imports
            .iter()
            .filter(|i| i.is_dot())
            .filter_map(|i| self.package(&i.path))
            .find(|p| p.type_decl(name).is_some())
            .map(|p| p.import_path.clone())
            .unwrap_or_else(|| package.import_path.clone())
    }

    /// Follow `(location, name)` through any alias chain to its target.
    pub fn follow_aliases(&self, location: &str, name: &str) -> Result<TypeTarget<'_>, ExtractionError> {
        let mut location = location.to_string();
        let mut name = name.to_string();
        let mut pointer = false;
        let mut seen: FxHashSet<(String, String)> = FxHashSet::default();

        for _ in 0..MAX_ALIAS_DEPTH {
            let package = self
                .package(&location)
                .ok_or_else(|| ExtractionError::PackageNotFound {
                    location: location.clone(),
                })?;
            let (file, decl) = package
                .type_decl(&name)
                .ok_or_else(|| ExtractionError::TypeNotFound {
                    name: name.clone(),
                    location: location.clone(),
                })?;
            let TypeDeclKind::Alias(target) = &decl.kind else {
                return Ok(TypeTarget::Declared {
                    package,
                    file,
                    decl,
                    pointer,
                });
            };
            if !seen.insert((package.import_path.clone(), name.clone())) {
                break;
            }

            let (inner, is_pointer) = target.deref();
            pointer |= is_pointer;
            let Some((qualifier, next)) = inner.head_named() else {
                return Ok(TypeTarget::Unnamed { expr: inner, pointer });
            };
            let next_location = self.locate_named(package, file, qualifier, next);
            if next_location.is_empty() {
                return Ok(TypeTarget::Unnamed { expr: inner, pointer });
            }
            location = next_location;
            name = next.to_string();
        }
        Err(ExtractionError::AliasCycle { name })
    }

    /// Render `expr` as Go syntax with every named type qualified by its
    /// import path, so signatures from different files compare equal.
    pub fn canonical_type(&self, package: &Package, file: &GoFile, expr: &TypeExpr) -> String {
        self.qualify(package, file, expr).to_string()
    }

    fn qualify(&self, package: &Package, file: &GoFile, expr: &TypeExpr) -> TypeExpr {
        let q = |e: &TypeExpr| Box::new(self.qualify(package, file, e));
        let list = |items: &[TypeExpr]| -> Vec<TypeExpr> {
            items.iter().map(|e| self.qualify(package, file, e)).collect()
        };
        match expr {
            TypeExpr::Named { qualifier, name } => {
                let location = self.locate_named(package, file, qualifier.as_deref(), name);
                let qualifier = (!location.is_empty()).then_some(location);
                TypeExpr::Named {
                    qualifier,
                    name: name.clone(),
                }
            }
            TypeExpr::Generic { base, args } => TypeExpr::Generic {
                base: q(base),
                args: list(args),
            },
            TypeExpr::Pointer(inner) => TypeExpr::Pointer(q(inner)),
            TypeExpr::Slice(elem) => TypeExpr::Slice(q(elem)),
            TypeExpr::Array { len, elem } => TypeExpr::Array {
                len: len.clone(),
                elem: q(elem),
            },
            TypeExpr::Map { key, value } => TypeExpr::Map {
                key: q(key),
                value: q(value),
            },
            TypeExpr::Chan { dir, elem } => TypeExpr::Chan {
                dir: *dir,
                elem: q(elem),
            },
            TypeExpr::Func { params, results } => TypeExpr::Func {
                params: list(params),
                results: list(results),
            },
            TypeExpr::Variadic(inner) => TypeExpr::Variadic(q(inner)),
            TypeExpr::Struct(_) | TypeExpr::Interface(_) | TypeExpr::Other(_) => expr.clone(),
        }
    }
}
