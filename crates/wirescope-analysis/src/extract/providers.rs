//! Provider (constructor) lookup.

use wirescope_core::errors::ExtractionError;
use wirescope_core::SearchScope;

use super::traits::ProviderFinder;
use super::types::ProviderRef;
use crate::codebase::CodebaseIndex;
use crate::parsers::TypeExpr;

impl ProviderFinder for CodebaseIndex {
    fn find_providers_returning(
        &self,
        type_name: &str,
        location: &str,
        scope: &SearchScope,
    ) -> Result<Vec<ProviderRef>, ExtractionError> {
        let location = self.normalize_location(location);
        let mut found = Vec::new();
        for package in self
            .packages()
            .iter()
            .filter(|p| scope.contains(&p.dir, &p.import_path))
        {
            for (file, func) in package.functions() {
                let returns_type = func.results.iter().any(|result| {
                    let result = match result {
                        TypeExpr::Pointer(inner) => inner.as_ref(),
                        other => other,
                    };
                    match result.head_named() {
                        Some((qualifier, name)) => {
                            name == type_name && self.locate_named(package, file, qualifier, name) == location
                        }
                        None => false,
                    }
                });
                if returns_type {
                    found.push(ProviderRef {
                        location: package.import_path.clone(),
                        name: func.name.clone(),
                    });
                }
            }
        }
        found.sort();
        Ok(found)
    }
}
