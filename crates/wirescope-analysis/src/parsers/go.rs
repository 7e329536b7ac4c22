//! Go parser using native tree-sitter.
//!
//! Extracts the package clause, imports, build constraint, type
//! declarations, and functions/methods (with the calls made in their
//! bodies) from a single Go source file.

use std::path::PathBuf;

use smallvec::SmallVec;
use tree_sitter::{Node, Parser};
use wirescope_core::errors::ParseError;
use wirescope_core::types::collections::SmallVec4;

use super::build_constraint::from_plus_build_lines;
use super::error_tolerant::count_errors;
use super::types::*;
use crate::scanner::hasher::hash_content;

/// Go parser. Holds a tree-sitter parser, so one instance per thread.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let language: tree_sitter::Language = tree_sitter_go::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| ParseError::GrammarLoad {
                message: e.to_string(),
            })?;
        Ok(Self { parser })
    }

    /// Parse `source`; `path` is recorded verbatim on the result.
    pub fn parse(&mut self, source: &[u8], path: &str) -> Result<GoFile, ParseError> {
        if std::str::from_utf8(source).is_err() {
            return Err(ParseError::InvalidUtf8 {
                path: PathBuf::from(path),
            });
        }
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ParseError::NoTree {
                path: PathBuf::from(path),
            })?;

        let root = tree.root_node();
        let (error_count, first_error_line) = count_errors(root);
        let mut file = GoFile {
            path: path.to_string(),
            content_hash: hash_content(source),
            error_count,
            first_error_line,
            ..GoFile::default()
        };

        let mut header_comments: Vec<&str> = Vec::new();
        for child in named_children(root) {
            match child.kind() {
                "comment" if file.package.is_empty() => {
                    header_comments.push(text(child, source));
                }
                "package_clause" => {
                    if let Some(name) = named_children(child).first() {
                        file.package = text(*name, source).to_string();
                    }
                }
                "import_declaration" => collect_imports(child, source, &mut file.imports),
                "type_declaration" => {
                    for spec in named_children(child) {
                        if let Some(decl) = parse_type_spec(spec, source) {
                            file.types.push(decl);
                        }
                    }
                }
                "function_declaration" | "method_declaration" => {
                    if let Some(func) = parse_function(child, source) {
                        file.functions.push(func);
                    }
                }
                _ => {}
            }
        }
        file.build_constraint = build_constraint(&header_comments);

        Ok(file)
    }
}

fn build_constraint(comments: &[&str]) -> Option<String> {
    let mut plus_build = Vec::new();
    for comment in comments {
        if let Some(expr) = comment.strip_prefix("//go:build ") {
            return Some(expr.trim().to_string());
        }
        if let Some(expr) = comment.strip_prefix("// +build ") {
            plus_build.push(expr.trim());
        }
    }
    from_plus_build_lines(&plus_build)
}

fn collect_imports(node: Node, source: &[u8], imports: &mut Vec<GoImport>) {
    for child in named_children(node) {
        match child.kind() {
            "import_spec" => {
                let Some(path) = child.child_by_field_name("path") else {
                    continue;
                };
                imports.push(GoImport {
                    path: text(path, source).trim_matches(|c| c == '"' || c == '`').to_string(),
                    alias: child
                        .child_by_field_name("name")
                        .map(|n| text(n, source).to_string()),
                });
            }
            "import_spec_list" => collect_imports(child, source, imports),
            _ => {}
        }
    }
}

fn parse_type_spec(spec: Node, source: &[u8]) -> Option<TypeDecl> {
    let name = text(spec.child_by_field_name("name")?, source).to_string();
    let ty = spec.child_by_field_name("type")?;
    let type_params = spec
        .child_by_field_name("type_parameters")
        .map(|list| parse_type_params(list, source))
        .unwrap_or_default();
    let kind = match (spec.kind(), ty.kind()) {
        ("type_alias", _) => TypeDeclKind::Alias(parse_type(ty, source)),
        ("type_spec", "struct_type") => TypeDeclKind::Struct(parse_struct_fields(ty, source)),
        ("type_spec", "interface_type") => TypeDeclKind::Interface(parse_interface(ty, source)),
        ("type_spec", _) => TypeDeclKind::Named(parse_type(ty, source)),
        _ => return None,
    };
    Some(TypeDecl {
        name,
        kind,
        type_params,
        line: line_of(spec),
    })
}

/// Names declared in `[K comparable, V any]`.
fn parse_type_params(list: Node, source: &[u8]) -> Vec<String> {
    named_children(list)
        .into_iter()
        .flat_map(|decl| field_children(decl, "name"))
        .map(|name| text(name, source).to_string())
        .collect()
}

fn parse_struct_fields(struct_type: Node, source: &[u8]) -> Vec<StructField> {
    let mut fields = Vec::new();
    let Some(list) = named_children(struct_type)
        .into_iter()
        .find(|n| n.kind() == "field_declaration_list")
    else {
        return fields;
    };

    for decl in named_children(list) {
        if decl.kind() != "field_declaration" {
            continue;
        }
        let Some(ty_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let ty = parse_type(ty_node, source);
        let names = field_children(decl, "name");
        if names.is_empty() {
            // Embedded field: named after its type, `*` is a separate token.
            let is_pointer = all_children(decl).iter().any(|c| c.kind() == "*");
            let name = ty
                .head_named()
                .map(|(_, name)| name.to_string())
                .unwrap_or_else(|| ty.to_string());
            let ty = if is_pointer {
                TypeExpr::Pointer(Box::new(ty))
            } else {
                ty
            };
            fields.push(StructField {
                name,
                ty,
                embedded: true,
            });
        } else {
            for name in names {
                fields.push(StructField {
                    name: text(name, source).to_string(),
                    ty: ty.clone(),
                    embedded: false,
                });
            }
        }
    }
    fields
}

fn parse_interface(interface_type: Node, source: &[u8]) -> InterfaceDecl {
    let mut decl = InterfaceDecl::default();
    for elem in named_children(interface_type) {
        match elem.kind() {
            "method_elem" | "method_spec" => {
                let Some(name) = elem.child_by_field_name("name") else {
                    continue;
                };
                decl.methods.push(MethodSig {
                    name: text(name, source).to_string(),
                    params: elem
                        .child_by_field_name("parameters")
                        .map(|p| parse_params(p, source))
                        .unwrap_or_default(),
                    results: elem
                        .child_by_field_name("result")
                        .map(|r| parse_result(r, source))
                        .unwrap_or_default(),
                });
            }
            "type_elem" => {
                // A single plain term is an embedded interface; unions and
                // `~T` terms only appear in constraints.
                let terms = named_children(elem);
                if let [term] = terms.as_slice() {
                    if matches!(term.kind(), "type_identifier" | "qualified_type" | "generic_type") {
                        decl.embeds.push(parse_type(*term, source));
                    }
                }
            }
            "type_identifier" | "qualified_type" => decl.embeds.push(parse_type(elem, source)),
            _ => {}
        }
    }
    decl
}

fn parse_function(node: Node, source: &[u8]) -> Option<FuncDecl> {
    let name = text(node.child_by_field_name("name")?, source).to_string();
    let receiver = node
        .child_by_field_name("receiver")
        .and_then(|r| parse_receiver(r, source));
    let params = node
        .child_by_field_name("parameters")
        .map(|p| parse_params(p, source))
        .unwrap_or_default();
    let results = node
        .child_by_field_name("result")
        .map(|r| parse_result(r, source))
        .unwrap_or_default();
    let calls = node
        .child_by_field_name("body")
        .map(|body| collect_calls(body, source))
        .unwrap_or_default();

    Some(FuncDecl {
        name,
        receiver,
        params,
        results,
        calls,
        line: line_of(node),
    })
}

fn parse_receiver(list: Node, source: &[u8]) -> Option<Receiver> {
    let decl = named_children(list)
        .into_iter()
        .find(|n| n.kind() == "parameter_declaration")?;
    let ty = parse_type(decl.child_by_field_name("type")?, source);
    let (inner, is_pointer) = ty.deref();
    let (_, type_name) = inner.head_named()?;
    Some(Receiver {
        type_name: type_name.to_string(),
        is_pointer,
    })
}

fn parse_params(list: Node, source: &[u8]) -> SmallVec4<TypeExpr> {
    let mut params = SmallVec::new();
    for decl in named_children(list) {
        let Some(ty_node) = decl.child_by_field_name("type") else {
            continue;
        };
        let ty = parse_type(ty_node, source);
        match decl.kind() {
            "parameter_declaration" => {
                let count = field_children(decl, "name").len().max(1);
                for _ in 0..count {
                    params.push(ty.clone());
                }
            }
            "variadic_parameter_declaration" => params.push(TypeExpr::Variadic(Box::new(ty))),
            _ => {}
        }
    }
    params
}

fn parse_result(node: Node, source: &[u8]) -> SmallVec4<TypeExpr> {
    if node.kind() == "parameter_list" {
        parse_params(node, source)
    } else {
        let mut results = SmallVec::new();
        results.push(parse_type(node, source));
        results
    }
}

/// Convert a tree-sitter type node into a `TypeExpr`.
pub(crate) fn parse_type(node: Node, source: &[u8]) -> TypeExpr {
    let field = |name: &str| node.child_by_field_name(name).map(|n| parse_type(n, source));
    let boxed = |ty: Option<TypeExpr>| Box::new(ty.unwrap_or_else(|| TypeExpr::Other(String::new())));
    let first_named = || named_children(node).first().map(|n| parse_type(*n, source));

    match node.kind() {
        "type_identifier" => TypeExpr::named(None, text(node, source)),
        "qualified_type" => match (
            node.child_by_field_name("package"),
            node.child_by_field_name("name"),
        ) {
            (Some(pkg), Some(name)) => TypeExpr::named(Some(text(pkg, source)), text(name, source)),
            _ => TypeExpr::Other(normalized_text(node, source)),
        },
        "pointer_type" => TypeExpr::Pointer(boxed(first_named())),
        "slice_type" => TypeExpr::Slice(boxed(field("element"))),
        "array_type" => TypeExpr::Array {
            len: node
                .child_by_field_name("length")
                .map(|n| text(n, source).to_string())
                .unwrap_or_default(),
            elem: boxed(field("element")),
        },
        "implicit_length_array_type" => TypeExpr::Array {
            len: "...".to_string(),
            elem: boxed(field("element")),
        },
        "map_type" => TypeExpr::Map {
            key: boxed(field("key")),
            value: boxed(field("value")),
        },
        "channel_type" => {
            let tokens: Vec<&str> = all_children(node)
                .iter()
                .filter(|c| !c.is_named())
                .map(|c| c.kind())
                .collect();
            let dir = match tokens.as_slice() {
                ["<-", "chan", ..] => ChanDir::Recv,
                ["chan", "<-", ..] => ChanDir::Send,
                _ => ChanDir::Both,
            };
            TypeExpr::Chan {
                dir,
                elem: boxed(field("value")),
            }
        }
        "function_type" => TypeExpr::Func {
            params: node
                .child_by_field_name("parameters")
                .map(|p| parse_params(p, source).into_vec())
                .unwrap_or_default(),
            results: node
                .child_by_field_name("result")
                .map(|r| parse_result(r, source).into_vec())
                .unwrap_or_default(),
        },
        "generic_type" => TypeExpr::Generic {
            base: boxed(field("type")),
            args: node
                .child_by_field_name("type_arguments")
                .map(|args| {
                    named_children(args)
                        .into_iter()
                        .map(|arg| parse_type(arg, source))
                        .collect()
                })
                .unwrap_or_default(),
        },
        "struct_type" => TypeExpr::Struct(normalized_text(node, source)),
        "interface_type" => TypeExpr::Interface(normalized_text(node, source)),
        "parenthesized_type" => first_named().unwrap_or_else(|| TypeExpr::Other(normalized_text(node, source))),
        "type_elem" => match named_children(node).as_slice() {
            [single] => parse_type(*single, source),
            _ => TypeExpr::Other(normalized_text(node, source)),
        },
        _ => TypeExpr::Other(normalized_text(node, source)),
    }
}

fn collect_calls(body: Node, source: &[u8]) -> Vec<CallSite> {
    let mut calls = Vec::new();
    let mut stack = vec![body];
    while let Some(node) = stack.pop() {
        if node.kind() == "call_expression" {
            if let Some(call) = parse_call(node, source) {
                calls.push(call);
            }
        }
        let mut children = named_children(node);
        // Reverse so calls come out in source order.
        children.reverse();
        stack.extend(children);
    }
    calls
}

fn parse_call(node: Node, source: &[u8]) -> Option<CallSite> {
    let function = node.child_by_field_name("function")?;
    let (receiver, callee) = match function.kind() {
        "selector_expression" => (
            Some(text(function.child_by_field_name("operand")?, source).to_string()),
            text(function.child_by_field_name("field")?, source).to_string(),
        ),
        "identifier" => (None, text(function, source).to_string()),
        _ => return None,
    };
    let arguments = node
        .child_by_field_name("arguments")
        .map(|args| {
            named_children(args)
                .into_iter()
                .filter(|a| a.kind() != "comment")
                .map(|a| normalized_text(a, source))
                .collect()
        })
        .unwrap_or_default();
    Some(CallSite {
        receiver,
        callee,
        arguments,
        line: line_of(node),
    })
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

fn all_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

fn text<'s>(node: Node, source: &'s [u8]) -> &'s str {
    node.utf8_text(source).unwrap_or("")
}

/// Node text with every whitespace run collapsed to one space.
fn normalized_text(node: Node, source: &[u8]) -> String {
    text(node, source).split_whitespace().collect::<Vec<_>>().join(" ")
}

fn line_of(node: Node) -> u32 {
    node.start_position().row as u32 + 1
}
