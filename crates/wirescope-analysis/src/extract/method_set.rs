//! Method sets: interface requirements and the methods a concrete type
//! offers through its pointer (value and pointer receivers, plus methods
//! promoted from embedded fields).

use std::collections::BTreeMap;

use wirescope_core::errors::ExtractionError;
use wirescope_core::types::FxHashSet;

use crate::builtin;
use crate::codebase::{CodebaseIndex, Package, TypeTarget};
use crate::parsers::{GoFile, InterfaceDecl, TypeDeclKind, TypeExpr};

/// Method name to canonical signature.
pub(crate) type MethodSet = BTreeMap<String, String>;

impl CodebaseIndex {
    /// Every method an interface requires, embedded interfaces flattened.
    pub(crate) fn interface_method_set(
        &self,
        package: &Package,
        file: &GoFile,
        iface: &InterfaceDecl,
    ) -> Result<MethodSet, ExtractionError> {
        let mut set = MethodSet::new();
        let mut visiting = FxHashSet::default();
        self.collect_interface_methods(package, file, iface, &mut set, &mut visiting)?;
        Ok(set)
    }

    fn collect_interface_methods(
        &self,
        package: &Package,
        file: &GoFile,
        iface: &InterfaceDecl,
        set: &mut MethodSet,
        visiting: &mut FxHashSet<(String, String)>,
    ) -> Result<(), ExtractionError> {
        for method in &iface.methods {
            let sig = self.signature(package, file, &method.params, &method.results);
            set.insert(method.name.clone(), sig);
        }

        for embed in &iface.embeds {
            let Some((qualifier, name)) = embed.head_named() else {
                continue;
            };
            let location = self.locate_named(package, file, qualifier, name);
            if let Some(known) = builtin::known_interface_methods(&location, name) {
                for (method, sig) in known {
                    set.insert((*method).to_string(), (*sig).to_string());
                }
                continue;
            }
            match self.follow_aliases(&location, name)? {
                TypeTarget::Declared {
                    package: embedded_pkg,
                    file: embedded_file,
                    decl,
                    ..
                } => {
                    let TypeDeclKind::Interface(embedded) = &decl.kind else {
                        return Err(ExtractionError::NotAnInterface {
                            name: decl.name.clone(),
                        });
                    };
                    if visiting.insert((embedded_pkg.import_path.clone(), decl.name.clone())) {
                        self.collect_interface_methods(embedded_pkg, embedded_file, embedded, set, visiting)?;
                    }
                }
                TypeTarget::Unnamed { .. } => {}
            }
        }
        Ok(())
    }

    /// Methods callable on `*T` for type `type_name` declared in `package`.
    pub(crate) fn pointer_method_set(&self, package: &Package, type_name: &str) -> MethodSet {
        let mut set = MethodSet::new();
        let mut visited = FxHashSet::default();
        self.collect_concrete_methods(package, type_name, &mut set, &mut visited);
        set
    }

    fn collect_concrete_methods(
        &self,
        package: &Package,
        type_name: &str,
        set: &mut MethodSet,
        visited: &mut FxHashSet<(String, String)>,
    ) {
        if !visited.insert((package.import_path.clone(), type_name.to_string())) {
            return;
        }
        for (file, method) in package.methods_of(type_name) {
            let sig = self.signature(package, file, &method.params, &method.results);
            set.entry(method.name.clone()).or_insert(sig);
        }

        let Some((file, decl)) = package.type_decl(type_name) else {
            return;
        };
        let TypeDeclKind::Struct(fields) = &decl.kind else {
            return;
        };
        for field in fields.iter().filter(|f| f.embedded) {
            let (inner, _) = field.ty.deref();
            let Some((qualifier, name)) = inner.head_named() else {
                continue;
            };
            let location = self.locate_named(package, file, qualifier, name);
            if let Some(known) = builtin::known_interface_methods(&location, name) {
                for (method, sig) in known {
                    set.entry((*method).to_string()).or_insert_with(|| (*sig).to_string());
                }
                continue;
            }
            let Ok(TypeTarget::Declared {
                package: embedded_pkg,
                file: embedded_file,
                decl: embedded,
                ..
            }) = self.follow_aliases(&location, name)
            else {
                continue;
            };
            match &embedded.kind {
                TypeDeclKind::Interface(iface) => {
                    let mut promoted = MethodSet::new();
                    let mut visiting = FxHashSet::default();
                    // An unresolvable embedded interface promotes nothing.
                    if self
                        .collect_interface_methods(embedded_pkg, embedded_file, iface, &mut promoted, &mut visiting)
                        .is_ok()
                    {
                        for (method, sig) in promoted {
                            set.entry(method).or_insert(sig);
                        }
                    }
                }
                _ => self.collect_concrete_methods(embedded_pkg, &embedded.name, set, visited),
            }
        }
    }

    fn signature(&self, package: &Package, file: &GoFile, params: &[TypeExpr], results: &[TypeExpr]) -> String {
        let func = TypeExpr::Func {
            params: params.to_vec(),
            results: results.to_vec(),
        };
        self.canonical_type(package, file, &func)
    }
}
