//! Text reporter: depth-indented dependency tree.

use std::fmt::Write;

use super::Reporter;
use wirescope_core::types::FxHashSet;

use crate::resolver::{DependencyForest, FieldNode, InterfaceResolution, ResolutionStatus, TypeId};

const INDENT: &str = "  ";

/// Renders each root as an indented tree. Within one root, a type is
/// expanded the first time it is reached; later references print a
/// `[shared]` marker, and a type already on the current path prints a
/// `[cycle]` marker.
pub struct TextReporter;

impl Reporter for TextReporter {
    fn name(&self) -> &'static str {
        "text"
    }

    fn generate(&self, forest: &DependencyForest) -> Result<String, String> {
        let mut out = String::new();
        for &root in forest.roots() {
            let mut walk = Walk::default();
            write_type(&mut out, forest, root, 0, &mut walk).map_err(|e| e.to_string())?;
        }
        Ok(out)
    }
}

#[derive(Default)]
struct Walk {
    path: Vec<TypeId>,
    expanded: FxHashSet<TypeId>,
}

fn write_type(
    out: &mut String,
    forest: &DependencyForest,
    id: TypeId,
    depth: usize,
    walk: &mut Walk,
) -> std::fmt::Result {
    let prefix = INDENT.repeat(depth);
    let node = forest.get(id);

    if let ResolutionStatus::Skipped(reason) = &node.status {
        return writeln!(out, "{prefix}[SKIPPED] {}: {reason}", node.name);
    }
    if walk.path.contains(&id) {
        return writeln!(out, "{prefix}{} (Package: {}) [cycle]", node.name, node.location);
    }
    if !walk.expanded.insert(id) {
        return writeln!(out, "{prefix}{} (Package: {}) [shared]", node.name, node.location);
    }
    writeln!(out, "{prefix}{} (Package: {})", node.name, node.location)?;
    for provider in &node.providers {
        writeln!(out, "{prefix}{INDENT}[Init] {} (Package: {})", provider.name, provider.location)?;
    }

    walk.path.push(id);
    for field in &node.fields {
        match field {
            FieldNode::Concrete { field_name, resolved } => {
                writeln!(out, "{prefix}>{field_name} ->")?;
                write_type(out, forest, *resolved, depth + 1, walk)?;
            }
            FieldNode::Interface {
                field_name,
                interface_name,
                is_pointer,
                resolution,
                ..
            } => {
                let star = if *is_pointer { "*" } else { "" };
                match resolution {
                    InterfaceResolution::Skipped(reason) => {
                        writeln!(out, "{prefix}>{field_name} -> {star}{interface_name} -> [SKIPPED] {reason}")?;
                    }
                    InterfaceResolution::ResolvedTo(target) => {
                        writeln!(out, "{prefix}>{field_name} -> {star}{interface_name} ->")?;
                        write_type(out, forest, *target, depth + 1, walk)?;
                    }
                    InterfaceResolution::Unresolved => {
                        writeln!(out, "{prefix}>{field_name} -> {star}{interface_name}")?;
                    }
                }
            }
            FieldNode::Primitive {
                field_name,
                type_name,
                is_pointer,
            } => {
                let star = if *is_pointer { "*" } else { "" };
                writeln!(out, "{prefix}>{field_name} -> {star}{type_name}")?;
            }
        }
    }
    walk.path.pop();
    Ok(())
}
