//! JSON reporter: nested trees, one per root.

use serde_json::{json, Value};

use super::Reporter;
use wirescope_core::types::FxHashSet;

use crate::resolver::{DependencyForest, FieldNode, InterfaceResolution, ResolutionStatus, TypeId};

/// Nested JSON. Within one root a type is expanded once; later references
/// are marked `"shared": true` and back-edges `"cycle": true`.
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn generate(&self, forest: &DependencyForest) -> Result<String, String> {
        let roots: Vec<Value> = forest
            .roots()
            .iter()
            .map(|&root| type_value(forest, root, &mut Walk::default()))
            .collect();
        let skipped_roots = forest.root_types().filter(|t| t.is_skipped()).count();

        let output = json!({
            "root_count": roots.len(),
            "skipped_roots": skipped_roots,
            "type_count": forest.cached_len(),
            "roots": roots,
        });
        serde_json::to_string_pretty(&output).map_err(|e| e.to_string())
    }
}

#[derive(Default)]
struct Walk {
    path: Vec<TypeId>,
    expanded: FxHashSet<TypeId>,
}

fn type_value(forest: &DependencyForest, id: TypeId, walk: &mut Walk) -> Value {
    let node = forest.get(id);
    if let ResolutionStatus::Skipped(reason) = &node.status {
        return json!({
            "name": node.name,
            "location": node.location,
            "status": "skipped",
            "skip_tag": reason.tag(),
            "skip_reason": reason.to_string(),
        });
    }
    if walk.path.contains(&id) {
        return json!({
            "name": node.name,
            "location": node.location,
            "cycle": true,
        });
    }
    if !walk.expanded.insert(id) {
        return json!({
            "name": node.name,
            "location": node.location,
            "shared": true,
        });
    }

    walk.path.push(id);
    let fields: Vec<Value> = node.fields.iter().map(|f| field_value(forest, f, walk)).collect();
    walk.path.pop();

    json!({
        "name": node.name,
        "location": node.location,
        "status": "resolved",
        "providers": node.providers.iter().map(|p| json!({
            "name": p.name,
            "location": p.location,
        })).collect::<Vec<_>>(),
        "fields": fields,
    })
}

fn field_value(forest: &DependencyForest, field: &FieldNode, walk: &mut Walk) -> Value {
    match field {
        FieldNode::Concrete { field_name, resolved } => json!({
            "name": field_name,
            "kind": "concrete",
            "type": type_value(forest, *resolved, walk),
        }),
        FieldNode::Interface {
            field_name,
            interface_name,
            interface_location,
            is_pointer,
            resolution,
        } => {
            let mut value = json!({
                "name": field_name,
                "kind": "interface",
                "interface_name": interface_name,
                "interface_location": interface_location,
                "is_pointer": is_pointer,
            });
            let (state, extra) = match resolution {
                InterfaceResolution::Unresolved => ("unresolved", None),
                InterfaceResolution::ResolvedTo(target) => {
                    ("resolved", Some(("binding", type_value(forest, *target, walk))))
                }
                InterfaceResolution::Skipped(reason) => (
                    "skipped",
                    Some(("skip_reason", Value::String(reason.to_string()))),
                ),
            };
            value["resolution"] = Value::String(state.to_string());
            if let Some((key, extra)) = extra {
                value[key] = extra;
            }
            value
        }
        FieldNode::Primitive {
            field_name,
            type_name,
            is_pointer,
        } => json!({
            "name": field_name,
            "kind": "primitive",
            "type_name": type_name,
            "is_pointer": is_pointer,
        }),
    }
}
