//! Interface implementation search by method-set matching.

use wirescope_core::errors::ExtractionError;
use wirescope_core::SearchScope;

use super::traits::ImplementationFinder;
use super::types::ImplementationRef;
use crate::builtin;
use crate::codebase::{CodebaseIndex, TypeTarget};
use crate::parsers::TypeDeclKind;

impl ImplementationFinder for CodebaseIndex {
    fn find_implementations(
        &self,
        interface_name: &str,
        interface_location: &str,
        scope: &SearchScope,
    ) -> Result<Vec<ImplementationRef>, ExtractionError> {
        let not_an_interface = || ExtractionError::NotAnInterface {
            name: interface_name.to_string(),
        };
        let required = match builtin::known_interface_methods(interface_location, interface_name) {
            Some(known) => known
                .iter()
                .map(|(method, sig)| ((*method).to_string(), (*sig).to_string()))
                .collect(),
            None => {
                let TypeTarget::Declared { package, file, decl, .. } =
                    self.follow_aliases(interface_location, interface_name)?
                else {
                    return Err(not_an_interface());
                };
                let TypeDeclKind::Interface(iface) = &decl.kind else {
                    return Err(not_an_interface());
                };
                self.interface_method_set(package, file, iface)?
            }
        };

        let mut found = Vec::new();
        for candidate_pkg in self
            .packages()
            .iter()
            .filter(|p| scope.contains(&p.dir, &p.import_path))
        {
            for (_, candidate) in candidate_pkg.type_decls() {
                if candidate.is_interface() || candidate.is_alias() {
                    continue;
                }
                let offered = self.pointer_method_set(candidate_pkg, &candidate.name);
                if required.iter().all(|(name, sig)| offered.get(name) == Some(sig)) {
                    found.push(ImplementationRef {
                        location: candidate_pkg.import_path.clone(),
                        type_name: candidate.name.clone(),
                    });
                }
            }
        }
        found.sort();

        tracing::debug!(
            interface = interface_name,
            location = interface_location,
            required = required.len(),
            found = found.len(),
            "implementation search"
        );
        Ok(found)
    }
}
