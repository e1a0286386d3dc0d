use codemap::analysis::{
    check_breaking_change, get_architecture, get_dependents, get_impact_report, ArchitectureLevel,
};
use codemap::core::{CodebaseAnalyzer, DependencyGraph, SymbolKind};
use codemap::store::SnapshotStore;
use std::fs;
use std::path::Path;

fn write_project(root: &Path) {
    fs::write(
        root.join("auth.py"),
        r#""""Token validation."""

def validate_token(token: str) -> bool:
    """Check token validity."""
    return len(token) > 0
"#,
    )
    .unwrap();

    fs::write(
        root.join("api.py"),
        r#"from auth import validate_token

def login(user, password):
    return validate_token(password)

def protected(request):
    return validate_token(request)
"#,
    )
    .unwrap();

    fs::write(
        root.join("middleware.py"),
        r#"def check_auth(request):
    return validate_token(request)
"#,
    )
    .unwrap();
}

#[test]
fn analyze_builds_a_queryable_snapshot() {
    let dir = tempfile::TempDir::new().unwrap();
    write_project(dir.path());

    let snapshot = CodebaseAnalyzer::new().analyze(dir.path()).unwrap();
    snapshot.validate().unwrap();

    let names: Vec<&str> = snapshot
        .symbols
        .iter()
        .map(|s| s.qualified_name.as_str())
        .collect();
    assert!(names.contains(&"auth"));
    assert!(names.contains(&"auth.validate_token"));
    assert!(names.contains(&"api.login"));
    assert!(names.contains(&"middleware.check_auth"));

    let validate = snapshot
        .symbols
        .iter()
        .find(|s| s.qualified_name == "auth.validate_token")
        .unwrap();
    assert_eq!(validate.kind, SymbolKind::Function);
    assert_eq!(validate.signature.as_deref(), Some("(token: str) -> bool"));
    assert_eq!(validate.docstring.as_deref(), Some("Check token validity."));

    let graph = DependencyGraph::from_snapshot(&snapshot);
    let report = get_dependents(&graph, "auth.validate_token", 0).unwrap();
    let callers: Vec<&str> = report.direct.iter().map(|r| r.symbol.as_str()).collect();
    assert!(callers.contains(&"api.login"));
    assert!(callers.contains(&"api.protected"));
    assert!(callers.contains(&"middleware.check_auth"));
}

#[test]
fn end_to_end_through_the_store() {
    let source = tempfile::TempDir::new().unwrap();
    write_project(source.path());
    let storage = tempfile::TempDir::new().unwrap();

    let snapshot = CodebaseAnalyzer::new().analyze(source.path()).unwrap();
    let store = SnapshotStore::new(storage.path());
    store.save("webapp", &snapshot).unwrap();

    let graph = DependencyGraph::from_snapshot(&store.load("webapp").unwrap());

    let impact = get_impact_report(&graph, "auth.validate_token", true).unwrap();
    assert!(impact.risk_score > 0);
    assert!(!impact.affected_files.is_empty());
    assert!(!impact.suggested_tests.is_empty());

    let breaking = check_breaking_change(
        &graph,
        "auth.validate_token",
        "(token: str, realm: str) -> bool",
    )
    .unwrap();
    assert!(breaking.is_breaking);
    assert!(!breaking.breaking_callers.is_empty());

    let architecture = get_architecture(&graph, ArchitectureLevel::Module);
    let module_names: Vec<&str> = architecture
        .modules
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert!(module_names.contains(&"auth"));
    assert!(module_names.contains(&"api"));
    assert!(architecture
        .dependencies
        .iter()
        .any(|e| e.from == "api" && e.to == "auth"));
}

#[test]
fn unreadable_files_are_skipped_not_fatal() {
    let dir = tempfile::TempDir::new().unwrap();
    write_project(dir.path());
    fs::write(dir.path().join("binary.py"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

    let snapshot = CodebaseAnalyzer::new().analyze(dir.path()).unwrap();
    assert!(snapshot
        .symbols
        .iter()
        .any(|s| s.qualified_name == "auth.validate_token"));
    assert!(!snapshot.symbols.iter().any(|s| s.file == "binary.py"));
}
