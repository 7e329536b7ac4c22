//! Resolver behaviour against in-memory collaborators: cycle safety, cache
//! identity, the interface binding policy and partial-failure isolation.

use std::cell::RefCell;
use std::collections::HashMap;

use wirescope_analysis::extract::{
    ExtractedField, ExtractedType, ImplementationFinder, ImplementationRef, ProviderFinder, ProviderRef, TypeExtractor,
};
use wirescope_analysis::resolver::{
    DependencyForest, DependencyResolver, FieldNode, InterfaceResolution, ResolutionStatus, SkipReason, TypeId,
    TypeKey,
};
use wirescope_core::errors::ExtractionError;
use wirescope_core::SearchScope;

type Key = (String, String);

fn key(location: &str, name: &str) -> Key {
    (location.to_string(), name.to_string())
}

#[derive(Default)]
struct FakeCodebase {
    structs: HashMap<Key, Vec<ExtractedField>>,
    implementations: HashMap<Key, Vec<ImplementationRef>>,
    lookup_errors: HashMap<Key, String>,
    providers: HashMap<Key, Vec<ProviderRef>>,
    failing_providers: bool,
    extract_calls: RefCell<Vec<Key>>,
    implementation_calls: RefCell<Vec<Key>>,
    provider_calls: RefCell<Vec<Key>>,
}

impl FakeCodebase {
    fn with_struct(mut self, location: &str, name: &str, fields: Vec<ExtractedField>) -> Self {
        self.structs.insert(key(location, name), fields);
        self
    }

    fn with_impls(mut self, location: &str, name: &str, impls: &[(&str, &str)]) -> Self {
        let refs = impls
            .iter()
            .map(|(loc, ty)| ImplementationRef {
                location: loc.to_string(),
                type_name: ty.to_string(),
            })
            .collect();
        self.implementations.insert(key(location, name), refs);
        self
    }

    fn extractions_of(&self, location: &str, name: &str) -> usize {
        let wanted = key(location, name);
        self.extract_calls.borrow().iter().filter(|k| **k == wanted).count()
    }

    fn resolver(&self) -> DependencyResolver<'_> {
        DependencyResolver::new(self, self, self, SearchScope::everything())
    }
}

impl TypeExtractor for FakeCodebase {
    fn extract_fields(&self, location: &str, type_name: &str) -> Result<ExtractedType, ExtractionError> {
        self.extract_calls.borrow_mut().push(key(location, type_name));
        self.structs
            .get(&key(location, type_name))
            .map(|fields| ExtractedType {
                type_name: type_name.to_string(),
                fields: fields.clone(),
            })
            .ok_or_else(|| ExtractionError::TypeNotFound {
                name: type_name.to_string(),
                location: location.to_string(),
            })
    }
}

impl ImplementationFinder for FakeCodebase {
    fn find_implementations(
        &self,
        interface_name: &str,
        interface_location: &str,
        _scope: &SearchScope,
    ) -> Result<Vec<ImplementationRef>, ExtractionError> {
        let k = key(interface_location, interface_name);
        self.implementation_calls.borrow_mut().push(k.clone());
        if let Some(message) = self.lookup_errors.get(&k) {
            return Err(ExtractionError::Other(message.clone()));
        }
        Ok(self.implementations.get(&k).cloned().unwrap_or_default())
    }
}

impl ProviderFinder for FakeCodebase {
    fn find_providers_returning(
        &self,
        type_name: &str,
        location: &str,
        _scope: &SearchScope,
    ) -> Result<Vec<ProviderRef>, ExtractionError> {
        let k = key(location, type_name);
        self.provider_calls.borrow_mut().push(k.clone());
        if self.failing_providers {
            return Err(ExtractionError::Other("provider index unavailable".into()));
        }
        Ok(self.providers.get(&k).cloned().unwrap_or_default())
    }
}

fn field(name: &str, ty: &str, location: &str) -> ExtractedField {
    ExtractedField::new(name, ty, location)
}

fn roots(keys: &[(&str, &str)]) -> Vec<TypeKey> {
    keys.iter().map(|(loc, name)| TypeKey::new(loc, name)).collect()
}

fn binding(forest: &DependencyForest, id: TypeId, field_index: usize) -> &InterfaceResolution {
    match &forest.get(id).fields[field_index] {
        FieldNode::Interface { resolution, .. } => resolution,
        other => panic!("expected interface field, got {other:?}"),
    }
}

fn concrete_target(forest: &DependencyForest, id: TypeId, field_index: usize) -> TypeId {
    match &forest.get(id).fields[field_index] {
        FieldNode::Concrete { resolved, .. } => *resolved,
        other => panic!("expected concrete field, got {other:?}"),
    }
}

fn layered_app() -> FakeCodebase {
    FakeCodebase::default()
        .with_struct("app/handler", "Handler", vec![field("service", "Service", "app/service").interface()])
        .with_struct("app/service", "ServiceImpl", vec![field("repo", "Repository", "app/repo").interface()])
        .with_struct("app/repo", "RepoImpl", vec![field("dsn", "string", "")])
        .with_impls("app/service", "Service", &[("app/service", "ServiceImpl")])
        .with_impls("app/repo", "Repository", &[("app/repo", "RepoImpl")])
}

#[test]
fn test_layered_scenario_resolves_without_skips() {
    let codebase = layered_app();
    let forest = codebase.resolver().resolve_roots(roots(&[("app/handler", "Handler")]));

    let handler = forest.roots()[0];
    assert_eq!(forest.get(handler).status, ResolutionStatus::Resolved);

    let InterfaceResolution::ResolvedTo(service) = binding(&forest, handler, 0) else {
        panic!("service not bound");
    };
    assert_eq!(forest.get(*service).name, "ServiceImpl");

    let InterfaceResolution::ResolvedTo(repo) = binding(&forest, *service, 0) else {
        panic!("repo not bound");
    };
    let repo = forest.get(*repo);
    assert_eq!(repo.name, "RepoImpl");
    assert_eq!(repo.location, "app/repo");
    assert!(matches!(repo.fields[0], FieldNode::Primitive { .. }));
    assert!(forest.nodes().iter().all(|n| !n.is_skipped()));
}

#[test]
fn test_zero_implementations_is_no_binding() {
    let codebase = FakeCodebase::default()
        .with_struct("app", "Handler", vec![field("cache", "Cache", "app/cache").interface()]);
    let forest = codebase.resolver().resolve_roots(roots(&[("app", "Handler")]));

    let InterfaceResolution::Skipped(reason) = binding(&forest, forest.roots()[0], 0) else {
        panic!("expected skip");
    };
    assert_eq!(*reason, SkipReason::NoBinding);
    assert_eq!(reason.to_string(), "no implementing types found");
}

#[test]
fn test_two_implementations_is_ambiguous() {
    let codebase = FakeCodebase::default()
        .with_struct("app", "Handler", vec![field("store", "Store", "app/store").interface()])
        .with_struct("app/store", "Memory", vec![])
        .with_struct("app/store", "Postgres", vec![])
        .with_impls("app/store", "Store", &[("app/store", "Memory"), ("app/store", "Postgres")]);
    let forest = codebase.resolver().resolve_roots(roots(&[("app", "Handler")]));

    let InterfaceResolution::Skipped(reason) = binding(&forest, forest.roots()[0], 0) else {
        panic!("expected skip");
    };
    assert_eq!(reason.to_string(), "multiple implementing types found (2)");
    assert_eq!(reason.tag(), "AMBIGUOUS_BINDING");
    // Ambiguous candidates are not resolved.
    assert_eq!(codebase.extractions_of("app/store", "Memory"), 0);
}

#[test]
fn test_self_reference_terminates_with_shared_identity() {
    let codebase = FakeCodebase::default().with_struct(
        "app",
        "Node",
        vec![field("next", "Node", "app").pointer(), field("value", "int", "")],
    );
    let forest = codebase.resolver().resolve_roots(roots(&[("app", "Node")]));

    let node = forest.roots()[0];
    assert_eq!(concrete_target(&forest, node, 0), node);
    assert_eq!(codebase.extractions_of("app", "Node"), 1);
    assert_eq!(forest.len(), 1);
}

#[test]
fn test_mutual_reference_terminates() {
    let codebase = FakeCodebase::default()
        .with_struct("app", "A", vec![field("b", "B", "app")])
        .with_struct("app", "B", vec![field("a", "A", "app").pointer()]);
    let forest = codebase.resolver().resolve_roots(roots(&[("app", "A")]));

    let a = forest.roots()[0];
    let b = concrete_target(&forest, a, 0);
    assert_eq!(forest.get(b).name, "B");
    assert_eq!(concrete_target(&forest, b, 0), a);
    assert_eq!(codebase.extractions_of("app", "A"), 1);
    assert_eq!(codebase.extractions_of("app", "B"), 1);
}

#[test]
fn test_cycle_through_interface_binding() {
    let codebase = FakeCodebase::default()
        .with_struct("app", "Parent", vec![field("child", "Child", "app").interface()])
        .with_struct("app", "ChildImpl", vec![field("parent", "Parent", "app").pointer()])
        .with_impls("app", "Child", &[("app", "ChildImpl")]);
    let forest = codebase.resolver().resolve_roots(roots(&[("app", "Parent")]));

    let parent = forest.roots()[0];
    let InterfaceResolution::ResolvedTo(child) = binding(&forest, parent, 0) else {
        panic!("child not bound");
    };
    assert_eq!(concrete_target(&forest, *child, 0), parent);
}

#[test]
fn test_shared_type_is_extracted_once() {
    let codebase = FakeCodebase::default()
        .with_struct("app", "R1", vec![field("c", "C", "app/shared")])
        .with_struct("app", "R2", vec![field("c", "C", "app/shared").pointer()])
        .with_struct("app/shared", "C", vec![field("n", "int", "")]);
    let forest = codebase.resolver().resolve_roots(roots(&[("app", "R1"), ("app", "R2")]));

    let c1 = concrete_target(&forest, forest.roots()[0], 0);
    let c2 = concrete_target(&forest, forest.roots()[1], 0);
    assert_eq!(c1, c2);
    assert_eq!(codebase.extractions_of("app/shared", "C"), 1);
}

#[test]
fn test_same_root_twice_yields_identical_tree() {
    let codebase = layered_app();
    let forest = codebase
        .resolver()
        .resolve_roots(roots(&[("app/handler", "Handler"), ("app/handler", "Handler")]));

    assert_eq!(forest.roots().len(), 2);
    assert_eq!(forest.roots()[0], forest.roots()[1]);
    assert_eq!(codebase.extractions_of("app/handler", "Handler"), 1);
}

#[test]
fn test_failing_root_does_not_abort_batch() {
    let codebase = FakeCodebase::default()
        .with_struct("app", "First", vec![field("n", "int", "")])
        .with_struct("app", "Third", vec![field("s", "string", "")]);
    let forest = codebase
        .resolver()
        .resolve_roots(roots(&[("app", "First"), ("app", "Missing"), ("app", "Third")]));

    let results: Vec<_> = forest.root_types().collect();
    assert_eq!(results.len(), 3);
    assert!(!results[0].is_skipped());
    assert!(!results[2].is_skipped());

    let missing = results[1];
    assert_eq!(missing.name, "Missing");
    assert!(missing.fields.is_empty());
    assert_eq!(
        missing.skip_reason().unwrap().to_string(),
        "failed to analyze: failed to extract struct fields for Missing: type Missing not found in package app"
    );
}

#[test]
fn test_extraction_failures_are_not_cached() {
    let codebase = FakeCodebase::default();
    let forest = codebase
        .resolver()
        .resolve_roots(roots(&[("app", "Missing"), ("app", "Missing")]));

    assert_eq!(codebase.extractions_of("app", "Missing"), 2);
    assert_eq!(forest.cached_len(), 0);
    assert!(forest.root_types().all(|t| t.is_skipped()));
}

#[test]
fn test_primitive_fields_never_reach_collaborators() {
    let codebase = FakeCodebase::default().with_struct(
        "app",
        "Config",
        vec![
            field("name", "string", ""),
            field("port", "int", "").pointer(),
            field("tags", "[]string", ""),
            field("limits", "map[string]int64", ""),
        ],
    );
    let forest = codebase.resolver().resolve_roots(roots(&[("app", "Config")]));

    assert_eq!(codebase.extract_calls.borrow().len(), 1);
    assert!(codebase.implementation_calls.borrow().is_empty());
    assert_eq!(codebase.provider_calls.borrow().len(), 1);

    let config = forest.get(forest.roots()[0]);
    assert!(config
        .fields
        .iter()
        .all(|f| matches!(f, FieldNode::Primitive { .. })));
    assert_eq!(
        config.fields[1],
        FieldNode::Primitive {
            field_name: "port".into(),
            type_name: "int".into(),
            is_pointer: true
        }
    );
}

#[test]
fn test_builtin_interface_is_unresolved_without_lookup() {
    let codebase = FakeCodebase::default().with_struct(
        "app",
        "Job",
        vec![field("err", "error", "").interface(), field("hook", "interface{ Run() }", "").interface()],
    );
    let forest = codebase.resolver().resolve_roots(roots(&[("app", "Job")]));

    let job = forest.roots()[0];
    assert_eq!(*binding(&forest, job, 0), InterfaceResolution::Unresolved);
    assert_eq!(*binding(&forest, job, 1), InterfaceResolution::Unresolved);
    assert!(codebase.implementation_calls.borrow().is_empty());
}

#[test]
fn test_lookup_failure_is_reported() {
    let mut codebase = FakeCodebase::default()
        .with_struct("app", "Handler", vec![field("svc", "Service", "app/svc").interface()]);
    codebase
        .lookup_errors
        .insert(key("app/svc", "Service"), "package app/svc has errors".into());
    let forest = codebase.resolver().resolve_roots(roots(&[("app", "Handler")]));

    let InterfaceResolution::Skipped(reason) = binding(&forest, forest.roots()[0], 0) else {
        panic!("expected skip");
    };
    assert_eq!(
        reason.to_string(),
        "failed to find interface references: package app/svc has errors"
    );
}

#[test]
fn test_unanalyzable_implementation_is_recursive_failure() {
    let codebase = FakeCodebase::default()
        .with_struct("app", "Handler", vec![field("svc", "Service", "app/svc").interface()])
        .with_impls("app/svc", "Service", &[("app/svc", "Level")]);
    let forest = codebase.resolver().resolve_roots(roots(&[("app", "Handler")]));

    let InterfaceResolution::Skipped(reason) = binding(&forest, forest.roots()[0], 0) else {
        panic!("expected skip");
    };
    assert!(matches!(reason, SkipReason::RecursiveAnalysisFailure { .. }));
    assert_eq!(
        reason.to_string(),
        "failed to analyze implementing type: failed to extract struct fields for Level: type Level not found in package app/svc"
    );
}

#[test]
fn test_concrete_field_wraps_skipped_type() {
    let codebase = FakeCodebase::default()
        .with_struct("app", "Server", vec![field("log", "Logger", "go.uber.org/zap").pointer()]);
    let forest = codebase.resolver().resolve_roots(roots(&[("app", "Server")]));

    let log = concrete_target(&forest, forest.roots()[0], 0);
    let log = forest.get(log);
    assert_eq!(log.name, "Logger");
    assert!(matches!(
        log.skip_reason(),
        Some(SkipReason::ExtractionFailure { .. })
    ));
}

#[test]
fn test_providers_are_recorded_and_failures_swallowed() {
    let mut codebase = layered_app();
    codebase.providers.insert(
        key("app/handler", "Handler"),
        vec![ProviderRef {
            location: "app/handler".into(),
            name: "NewHandler".into(),
        }],
    );
    let forest = codebase.resolver().resolve_roots(roots(&[("app/handler", "Handler")]));
    assert_eq!(forest.get(forest.roots()[0]).providers[0].name, "NewHandler");

    codebase.failing_providers = true;
    let forest = codebase.resolver().resolve_roots(roots(&[("app/handler", "Handler")]));
    let handler = forest.get(forest.roots()[0]);
    assert!(handler.providers.is_empty());
    assert!(!handler.is_skipped());
}

#[test]
fn test_provider_lookup_can_be_disabled() {
    let codebase = layered_app();
    codebase
        .resolver()
        .with_provider_lookup(false)
        .resolve_roots(roots(&[("app/handler", "Handler")]));
    assert!(codebase.provider_calls.borrow().is_empty());
}

#[test]
fn test_empty_location_is_its_own_key() {
    let codebase = FakeCodebase::default()
        .with_struct("", "App", vec![])
        .with_struct("example.com/app", "App", vec![]);
    let forest = codebase
        .resolver()
        .resolve_roots(roots(&[("", "App"), ("example.com/app", "App")]));

    assert_ne!(forest.roots()[0], forest.roots()[1]);
    assert_eq!(forest.cached_len(), 2);
}

#[test]
fn test_forest_serializes() {
    let codebase = layered_app();
    let forest = codebase.resolver().resolve_roots(roots(&[("app/handler", "Handler")]));
    let value = serde_json::to_value(&forest).unwrap();
    assert_eq!(value["roots"], serde_json::json!([0]));
    assert_eq!(value["nodes"][0]["name"], "Handler");
    assert_eq!(value["nodes"][0]["fields"][0]["kind"], "interface");
}
