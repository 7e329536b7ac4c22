//! A Go package: the indexed files of one directory.

use serde::Serialize;

use crate::parsers::{FuncDecl, GoFile, TypeDecl};

#[derive(Debug, Clone, Serialize)]
pub struct Package {
    pub import_path: String,
    /// Root-relative directory, `""` for the root.
    pub dir: String,
    pub name: String,
    pub files: Vec<GoFile>,
}

impl Package {
    /// The declaration of type `name` and the file declaring it.
    pub fn type_decl(&self, name: &str) -> Option<(&GoFile, &TypeDecl)> {
        self.files
            .iter()
            .find_map(|file| file.type_decl(name).map(|decl| (file, decl)))
    }

    /// Top-level functions (not methods).
    pub fn functions(&self) -> impl Iterator<Item = (&GoFile, &FuncDecl)> {
        self.all_functions().filter(|(_, func)| !func.is_method())
    }

    /// Methods declared with receiver type `type_name` (value or pointer).
    pub fn methods_of<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = (&'a GoFile, &'a FuncDecl)> {
        self.all_functions().filter(move |(_, func)| {
            func.receiver
                .as_ref()
                .is_some_and(|r| r.type_name == type_name)
        })
    }

    /// All type declarations with their files.
    pub fn type_decls(&self) -> impl Iterator<Item = (&GoFile, &TypeDecl)> {
        self.files
            .iter()
            .flat_map(|file| file.types.iter().map(move |decl| (file, decl)))
    }

    /// First file with syntax errors.
    pub fn first_error_file(&self) -> Option<&GoFile> {
        self.files.iter().find(|f| f.has_errors())
    }

    fn all_functions(&self) -> impl Iterator<Item = (&GoFile, &FuncDecl)> {
        self.files
            .iter()
            .flat_map(|file| file.functions.iter().map(move |func| (file, func)))
    }
}
