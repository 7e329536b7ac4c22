//! End-to-end wire analysis over on-disk Go projects.

use std::fs;
use std::path::{Path, PathBuf};

use wirescope_analysis::reporters::{Reporter, TextReporter};
use wirescope_analysis::resolver::{FieldNode, InterfaceResolution, SkipReason, TypeKey};
use wirescope_analysis::WireAnalyzer;
use wirescope_core::errors::{DiscoveryError, PipelineError};
use wirescope_core::{AnalysisConfig, WirescopeConfig, WirescopeErrorCode};

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/go/basic")
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn with_scope(patterns: &[&str]) -> WirescopeConfig {
    WirescopeConfig {
        analysis: AnalysisConfig {
            search_scope: patterns.iter().map(|p| p.to_string()).collect(),
            ..AnalysisConfig::default()
        },
        ..WirescopeConfig::default()
    }
}

#[test]
fn test_basic_fixture_resolves_full_tree() {
    let analyzer = WireAnalyzer::new(fixture_root(), WirescopeConfig::default());
    let analysis = analyzer.analyze_wire_file(Path::new("wire.go")).unwrap();

    assert_eq!(analysis.injectors.len(), 1);
    assert_eq!(analysis.injectors[0].provider_name, "InitializeUserHandler");
    assert_eq!(analysis.injectors[0].listed_providers.len(), 3);
    assert!(analysis.errors.is_empty());

    let text = TextReporter.generate(&analysis.forest).unwrap();
    let expected = "\
UserHandler (Package: example.com/basic/handler)
  [Init] NewUserHandler (Package: example.com/basic/handler)
>service -> UserService ->
  userService (Package: example.com/basic/service)
  >repo -> UserRepository ->
    memoryRepository (Package: example.com/basic/repository)
    >users -> map[int]*User
>prefix -> string
";
    assert_eq!(text, expected);
    assert!(analysis.forest.nodes().iter().all(|n| !n.is_skipped()));
}

#[test]
fn test_wire_file_is_excluded_from_index() {
    let analyzer = WireAnalyzer::new(fixture_root(), WirescopeConfig::default());
    let index = analyzer.build_index().unwrap();

    assert_eq!(index.module().path, "example.com/basic");
    assert_eq!(index.excluded_files(), 1);
    let main = index.root_package().unwrap();
    assert_eq!(main.files.len(), 1);
    assert_eq!(main.files[0].path, "main.go");
}

#[test]
fn test_search_scope_limits_implementation_search() {
    let analyzer = WireAnalyzer::new(fixture_root(), with_scope(&["./handler/..."]));
    let analysis = analyzer.analyze_wire_file(Path::new("wire.go")).unwrap();

    let handler = analysis.forest.get(analysis.forest.roots()[0]);
    match &handler.fields[0] {
        FieldNode::Interface { resolution, .. } => {
            assert_eq!(*resolution, InterfaceResolution::Skipped(SkipReason::NoBinding));
        }
        other => panic!("unexpected field {other:?}"),
    }
}

#[test]
fn test_missing_wire_file_aborts_run() {
    let analyzer = WireAnalyzer::new(fixture_root(), WirescopeConfig::default());
    let err = analyzer.analyze_wire_file(Path::new("missing_wire.go")).unwrap_err();
    assert!(matches!(err, PipelineError::Discovery(DiscoveryError::Io { .. })));
    assert_eq!(err.error_code(), "DISCOVERY_ERROR");
}

#[test]
fn test_ambiguous_binding_and_partial_failure() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "go.mod", "module example.com/shop\n\ngo 1.22\n");
    write(
        root,
        "app.go",
        "package main\n\nimport \"example.com/shop/store\"\n\ntype App struct {\n\tstore store.Store\n\tname string\n}\n",
    );
    write(
        root,
        "store/store.go",
        "package store\n\ntype Store interface {\n\tSave(key string) error\n}\n\ntype Memory struct{}\n\nfunc (m *Memory) Save(key string) error { return nil }\n\ntype Disk struct{ path string }\n\nfunc (d Disk) Save(k string) error { return nil }\n",
    );
    write(
        root,
        "wire.go",
        "//go:build wireinject\n\npackage main\n\nimport \"github.com/google/wire\"\n\nfunc InitApp() (*App, error) {\n\twire.Build(NewApp)\n\treturn nil, nil\n}\n\nfunc InitGhost() *Ghost {\n\twire.Build(NewGhost)\n\treturn nil\n}\n",
    );

    let analyzer = WireAnalyzer::new(root, WirescopeConfig::default());
    let analysis = analyzer.analyze_wire_file(&root.join("wire.go")).unwrap();
    let roots: Vec<_> = analysis.forest.root_types().collect();
    assert_eq!(roots.len(), 2);

    let app = roots[0];
    assert_eq!(app.name, "App");
    assert_eq!(app.location, "");
    match &app.fields[0] {
        FieldNode::Interface {
            interface_location,
            resolution: InterfaceResolution::Skipped(reason),
            ..
        } => {
            assert_eq!(interface_location, "example.com/shop/store");
            assert_eq!(reason.to_string(), "multiple implementing types found (2)");
        }
        other => panic!("unexpected field {other:?}"),
    }

    let ghost = roots[1];
    assert!(ghost.is_skipped());
    assert!(ghost
        .skip_reason()
        .unwrap()
        .to_string()
        .starts_with("failed to analyze: failed to extract struct fields for Ghost: type Ghost not found"));
}

#[test]
fn test_wire_file_in_subpackage_maps_local_types() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "go.mod", "module example.com/svc\n");
    write(root, "cmd/server/server.go", "package main\n\ntype Server struct {\n\tport int\n}\n");
    write(
        root,
        "cmd/server/wire.go",
        "//go:build wireinject\n\npackage main\n\nimport \"github.com/google/wire\"\n\nfunc Init() *Server {\n\twire.Build(NewServer)\n\treturn nil\n}\n",
    );

    let analyzer = WireAnalyzer::new(root, WirescopeConfig::default());
    let analysis = analyzer
        .analyze_wire_file(&root.join("cmd/server/wire.go"))
        .unwrap();
    let server = analysis.forest.root_types().next().unwrap();
    assert_eq!(server.location, "example.com/svc/cmd/server");
    assert!(!server.is_skipped());
}

#[test]
fn test_analyze_types_without_wire_file() {
    let analyzer = WireAnalyzer::new(fixture_root(), WirescopeConfig::default());
    let forest = analyzer
        .analyze_types(vec![TypeKey::new("example.com/basic/service", "userService")])
        .unwrap();
    let service = forest.root_types().next().unwrap();
    assert_eq!(service.fields.len(), 1);
    assert!(matches!(
        &service.fields[0],
        FieldNode::Interface {
            resolution: InterfaceResolution::ResolvedTo(_),
            ..
        }
    ));
}

#[test]
fn test_invalid_scope_is_config_error() {
    let analyzer = WireAnalyzer::new(fixture_root(), with_scope(&["../escape/..."]));
    let err = analyzer.analyze_wire_file(Path::new("wire.go")).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}
