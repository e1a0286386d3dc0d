use codemap::analysis::{get_architecture, ArchitectureLevel, HotspotRisk};
use codemap::core::{
    CodeMapSnapshot, Dependency, DependencyGraph, DependencyKind, Symbol, SymbolKind,
};

fn func(qualified_name: &str, file: &str) -> Symbol {
    Symbol::new(
        qualified_name.to_string(),
        SymbolKind::Function,
        file.to_string(),
        1,
    )
}

fn calls(from: &str, to: &str) -> Dependency {
    Dependency::new(from.to_string(), to.to_string(), DependencyKind::Calls)
}

fn graph(symbols: Vec<Symbol>, dependencies: Vec<Dependency>) -> DependencyGraph {
    let snapshot = CodeMapSnapshot::new("src".to_string(), symbols, dependencies);
    snapshot.validate().unwrap();
    DependencyGraph::from_snapshot(&snapshot)
}

#[test]
fn module_rollup_counts_symbols_and_degrees() {
    let graph = graph(
        vec![
            func("api.login", "api.py"),
            func("api.logout", "api.py"),
            func("auth.validate", "auth.py"),
        ],
        vec![
            calls("api.login", "auth.validate"),
            calls("api.logout", "auth.validate"),
        ],
    );

    let report = get_architecture(&graph, ArchitectureLevel::Module);
    assert_eq!(report.level, ArchitectureLevel::Module);
    assert_eq!(report.modules.len(), 2);

    let api = report.modules.iter().find(|m| m.name == "api").unwrap();
    assert_eq!(api.symbols, 2);
    assert_eq!(api.dependents, 0);
    assert_eq!(api.dependencies, 1);

    let auth = report.modules.iter().find(|m| m.name == "auth").unwrap();
    assert_eq!(auth.symbols, 1);
    assert_eq!(auth.dependents, 1);
    assert_eq!(auth.dependencies, 0);
}

#[test]
fn parallel_symbol_edges_roll_into_one_weighted_edge() {
    let graph = graph(
        vec![
            func("api.login", "api.py"),
            func("api.logout", "api.py"),
            func("auth.validate", "auth.py"),
        ],
        vec![
            calls("api.login", "auth.validate"),
            calls("api.logout", "auth.validate"),
        ],
    );

    let report = get_architecture(&graph, ArchitectureLevel::Module);
    assert_eq!(report.dependencies.len(), 1);
    let edge = &report.dependencies[0];
    assert_eq!(edge.from, "api");
    assert_eq!(edge.to, "auth");
    assert_eq!(edge.count, 2);
}

#[test]
fn same_module_edges_are_dropped() {
    let graph = graph(
        vec![func("m.a", "m.py"), func("m.b", "m.py")],
        vec![calls("m.a", "m.b")],
    );

    let report = get_architecture(&graph, ArchitectureLevel::Module);
    assert!(report.dependencies.is_empty());
    assert!(report.cycles.is_empty());
}

#[test]
fn package_level_buckets_by_top_directory() {
    let graph = graph(
        vec![
            func("api.v1.login", "api/v1.py"),
            func("api.v2.login", "api/v2.py"),
            func("auth.core.validate", "auth/core.py"),
        ],
        vec![
            calls("api.v1.login", "auth.core.validate"),
            calls("api.v2.login", "auth.core.validate"),
        ],
    );

    let report = get_architecture(&graph, ArchitectureLevel::Package);
    let names: Vec<&str> = report.modules.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["api", "auth"]);

    let api = report.modules.iter().find(|m| m.name == "api").unwrap();
    assert_eq!(api.symbols, 2);
    assert_eq!(report.dependencies.len(), 1);
    assert_eq!(report.dependencies[0].count, 2);
}

#[test]
fn acyclic_graph_reports_no_cycles() {
    let graph = graph(
        vec![
            func("a.f", "a.py"),
            func("b.f", "b.py"),
            func("c.f", "c.py"),
        ],
        vec![calls("a.f", "b.f"), calls("b.f", "c.f"), calls("a.f", "c.f")],
    );

    let report = get_architecture(&graph, ArchitectureLevel::Module);
    assert!(report.cycles.is_empty());
}

#[test]
fn two_module_cycle_is_detected_once() {
    let graph = graph(
        vec![func("a.f", "a.py"), func("b.g", "b.py")],
        vec![calls("a.f", "b.g"), calls("b.g", "a.f")],
    );

    let report = get_architecture(&graph, ArchitectureLevel::Module);
    assert_eq!(report.cycles.len(), 1);
    let mut cycle = report.cycles[0].clone();
    cycle.sort();
    assert_eq!(cycle, vec!["a", "b"]);
}

#[test]
fn rotated_cycles_are_deduplicated() {
    // a -> b -> c -> a plus chords that re-enter the same cycle.
    let graph = graph(
        vec![
            func("a.f", "a.py"),
            func("b.f", "b.py"),
            func("c.f", "c.py"),
        ],
        vec![calls("a.f", "b.f"), calls("b.f", "c.f"), calls("c.f", "a.f")],
    );

    let report = get_architecture(&graph, ArchitectureLevel::Module);
    assert_eq!(report.cycles.len(), 1);
    let mut cycle = report.cycles[0].clone();
    cycle.sort();
    assert_eq!(cycle, vec!["a", "b", "c"]);
}

#[test]
fn hotspots_require_more_than_five_dependents() {
    // hub has 6 dependent modules -> MEDIUM hotspot.
    let mut symbols = vec![func("hub.core", "hub.py")];
    let mut dependencies = Vec::new();
    for i in 0..6 {
        let name = format!("mod{i}.use_hub");
        symbols.push(func(&name, &format!("mod{i}.py")));
        dependencies.push(calls(&name, "hub.core"));
    }
    let graph = graph(symbols, dependencies);

    let report = get_architecture(&graph, ArchitectureLevel::Module);
    assert_eq!(report.hotspots.len(), 1);
    assert_eq!(report.hotspots[0].name, "hub");
    assert_eq!(report.hotspots[0].dependents, 6);
    assert_eq!(report.hotspots[0].risk, HotspotRisk::Medium);
}

#[test]
fn heavy_hotspots_are_high_risk_and_sorted() {
    let mut symbols = vec![func("hub.core", "hub.py"), func("util.core", "util.py")];
    let mut dependencies = Vec::new();
    for i in 0..11 {
        let name = format!("mod{i}.run");
        symbols.push(func(&name, &format!("mod{i}.py")));
        dependencies.push(calls(&name, "hub.core"));
        if i < 7 {
            dependencies.push(calls(&name, "util.core"));
        }
    }
    let graph = graph(symbols, dependencies);

    let report = get_architecture(&graph, ArchitectureLevel::Module);
    assert_eq!(report.hotspots.len(), 2);
    assert_eq!(report.hotspots[0].name, "hub");
    assert_eq!(report.hotspots[0].risk, HotspotRisk::High);
    assert_eq!(report.hotspots[1].name, "util");
    assert_eq!(report.hotspots[1].risk, HotspotRisk::Medium);
}

#[test]
fn five_dependents_is_not_a_hotspot() {
    let mut symbols = vec![func("hub.core", "hub.py")];
    let mut dependencies = Vec::new();
    for i in 0..5 {
        let name = format!("mod{i}.run");
        symbols.push(func(&name, &format!("mod{i}.py")));
        dependencies.push(calls(&name, "hub.core"));
    }
    let graph = graph(symbols, dependencies);

    let report = get_architecture(&graph, ArchitectureLevel::Module);
    assert!(report.hotspots.is_empty());
}

#[test]
fn summary_counts_all_sections() {
    let graph = graph(
        vec![func("a.f", "a.py"), func("b.g", "b.py")],
        vec![calls("a.f", "b.g"), calls("b.g", "a.f")],
    );

    let report = get_architecture(&graph, ArchitectureLevel::Module);
    assert_eq!(
        report.summary,
        "2 module(s), 2 cross-module dependency edge(s), 0 hotspot(s), 1 cycle(s)"
    );
}
