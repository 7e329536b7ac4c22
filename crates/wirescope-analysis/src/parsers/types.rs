//! Go syntax model produced by the parser.
//!
//! Everything downstream (index, extractor, implementation finder, root
//! discovery) consumes these types; nothing holds on to tree-sitter nodes.

use std::fmt;

use serde::{Deserialize, Serialize};
use wirescope_core::types::collections::SmallVec4;

/// One parsed Go source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoFile {
    /// Root-relative path, `/`-separated.
    pub path: String,
    pub package: String,
    pub imports: Vec<GoImport>,
    /// Expression of the `//go:build` line (or joined `// +build` lines).
    pub build_constraint: Option<String>,
    pub types: Vec<TypeDecl>,
    pub functions: Vec<FuncDecl>,
    pub content_hash: u64,
    pub error_count: u32,
    /// 1-based line of the first syntax error.
    pub first_error_line: Option<u32>,
}

impl GoFile {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Look up a type declared in this file.
    pub fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Import whose explicit alias is `alias`.
    pub fn import_with_alias(&self, alias: &str) -> Option<&GoImport> {
        self.imports.iter().find(|i| i.alias.as_deref() == Some(alias))
    }
}

/// An import spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoImport {
    pub path: String,
    /// Explicit name: an identifier, `_` or `.`.
    pub alias: Option<String>,
}

impl GoImport {
    /// Local name guessed from the import path when the package itself is
    /// not available: last element, skipping a `/vN` major-version suffix and
    /// a `gopkg.in`-style `.vN` suffix.
    pub fn default_local_name(&self) -> &str {
        let mut segments = self.path.rsplit('/');
        let last = segments.next().unwrap_or(&self.path);
        let last = if is_major_version(last) {
            segments.next().unwrap_or(last)
        } else {
            last
        };
        match last.rfind(".v") {
            Some(idx) if is_major_version(&last[idx + 1..]) => &last[..idx],
            _ => last,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.alias.as_deref() == Some("_")
    }

    pub fn is_dot(&self) -> bool {
        self.alias.as_deref() == Some(".")
    }
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// A top-level type declaration (`type X ...` or `type X = ...`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeDeclKind,
    /// Type parameter names, empty for non-generic declarations.
    pub type_params: Vec<String>,
    pub line: u32,
}

impl TypeDecl {
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeDeclKind::Interface(_))
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.kind, TypeDeclKind::Alias(_))
    }

    pub fn is_type_param(&self, name: &str) -> bool {
        self.type_params.iter().any(|p| p == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TypeDeclKind {
    Struct(Vec<StructField>),
    Interface(InterfaceDecl),
    /// `type X = Y`
    Alias(TypeExpr),
    /// `type X Y` where `Y` is not a struct or interface literal.
    Named(TypeExpr),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub ty: TypeExpr,
    pub embedded: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterfaceDecl {
    pub methods: Vec<MethodSig>,
    /// Embedded interfaces (`io.Reader`, `Base`).
    pub embeds: Vec<TypeExpr>,
}

/// A method signature with parameter names dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSig {
    pub name: String,
    pub params: SmallVec4<TypeExpr>,
    pub results: SmallVec4<TypeExpr>,
}

/// A function or method declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuncDecl {
    pub name: String,
    pub receiver: Option<Receiver>,
    pub params: SmallVec4<TypeExpr>,
    pub results: SmallVec4<TypeExpr>,
    pub calls: Vec<CallSite>,
    pub line: u32,
}

impl FuncDecl {
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }

    pub fn signature(&self) -> MethodSig {
        MethodSig {
            name: self.name.clone(),
            params: self.params.clone(),
            results: self.results.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receiver {
    pub type_name: String,
    pub is_pointer: bool,
}

/// A call inside a function body: `receiver.callee(arguments...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub receiver: Option<String>,
    pub callee: String,
    /// Source text of each argument expression.
    pub arguments: Vec<String>,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// A syntactic Go type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeExpr {
    Named {
        qualifier: Option<String>,
        name: String,
    },
    Generic {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array {
        len: String,
        elem: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeExpr>,
    },
    Func {
        params: Vec<TypeExpr>,
        results: Vec<TypeExpr>,
    },
    Variadic(Box<TypeExpr>),
    /// Anonymous struct literal, kept as source text.
    Struct(String),
    /// Anonymous interface literal, kept as source text.
    Interface(String),
    /// Anything the parser does not model, kept as source text.
    Other(String),
}

impl TypeExpr {
    pub fn named(qualifier: Option<&str>, name: &str) -> Self {
        Self::Named {
            qualifier: qualifier.map(str::to_string),
            name: name.to_string(),
        }
    }

    /// Strip every pointer layer, returning the pointee and whether any
    /// layer was removed.
    pub fn deref(&self) -> (&TypeExpr, bool) {
        let mut current = self;
        let mut is_pointer = false;
        while let TypeExpr::Pointer(inner) = current {
            current = inner;
            is_pointer = true;
        }
        (current, is_pointer)
    }

    /// The named type at the head of this expression (`Foo`, `pkg.Foo`,
    /// `Foo[T]`), ignoring generic arguments.
    pub fn head_named(&self) -> Option<(Option<&str>, &str)> {
        match self {
            TypeExpr::Named { qualifier, name } => Some((qualifier.as_deref(), name)),
            TypeExpr::Generic { base, .. } => base.head_named(),
            _ => None,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named {
                qualifier: Some(q),
                name,
            } => write!(f, "{q}.{name}"),
            TypeExpr::Named {
                qualifier: None,
                name,
            } => f.write_str(name),
            TypeExpr::Generic { base, args } => {
                write!(f, "{base}[")?;
                write_list(f, args)?;
                f.write_str("]")
            }
            TypeExpr::Pointer(inner) => write!(f, "*{inner}"),
            TypeExpr::Slice(elem) => write!(f, "[]{elem}"),
            TypeExpr::Array { len, elem } => write!(f, "[{len}]{elem}"),
            TypeExpr::Map { key, value } => write!(f, "map[{key}]{value}"),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {elem}"),
                ChanDir::Send => write!(f, "chan<- {elem}"),
                ChanDir::Recv => write!(f, "<-chan {elem}"),
            },
            TypeExpr::Func { params, results } => {
                f.write_str("func(")?;
                write_list(f, params)?;
                f.write_str(")")?;
                match results.len() {
                    0 => Ok(()),
                    1 => write!(f, " {}", results[0]),
                    _ => {
                        f.write_str(" (")?;
                        write_list(f, results)?;
                        f.write_str(")")
                    }
                }
            }
            TypeExpr::Variadic(inner) => write!(f, "...{inner}"),
            TypeExpr::Struct(text) | TypeExpr::Interface(text) | TypeExpr::Other(text) => {
                f.write_str(text)
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[TypeExpr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_local_names() {
        let import = |path: &str| GoImport {
            path: path.to_string(),
            alias: None,
        };
        assert_eq!(import("example.com/app/service").default_local_name(), "service");
        assert_eq!(import("github.com/jackc/pgx/v5").default_local_name(), "pgx");
        assert_eq!(import("gopkg.in/yaml.v3").default_local_name(), "yaml");
        assert_eq!(import("fmt").default_local_name(), "fmt");
    }

    #[test]
    fn display_renders_go_syntax() {
        let ty = TypeExpr::Map {
            key: Box::new(TypeExpr::named(None, "string")),
            value: Box::new(TypeExpr::Pointer(Box::new(TypeExpr::named(
                Some("repository"),
                "User",
            )))),
        };
        assert_eq!(ty.to_string(), "map[string]*repository.User");

        let func = TypeExpr::Func {
            params: vec![TypeExpr::named(None, "int")],
            results: vec![TypeExpr::named(None, "string"), TypeExpr::named(None, "error")],
        };
        assert_eq!(func.to_string(), "func(int) (string, error)");
    }

    #[test]
    fn deref_strips_all_pointer_layers() {
        let ty = TypeExpr::Pointer(Box::new(TypeExpr::Pointer(Box::new(TypeExpr::named(
            None, "Config",
        )))));
        let (inner, is_pointer) = ty.deref();
        assert!(is_pointer);
        assert_eq!(inner, &TypeExpr::named(None, "Config"));
    }
}
