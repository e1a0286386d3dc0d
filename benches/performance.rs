use criterion::{black_box, criterion_group, criterion_main, Criterion};
use codemap::analysis::{get_architecture, get_dependents, get_impact_report, ArchitectureLevel};
use codemap::core::{CodebaseAnalyzer, DependencyGraph};

fn benchmark_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("codebase_analysis");

    // Create test directories with sample code
    let test_dir = std::env::temp_dir().join("codemap_bench");
    std::fs::create_dir_all(&test_dir).unwrap();

    for i in 0..10 {
        let content = format!(
            r#"
class Service{i}:
    def __init__(self):
        self.value = {i}

    def process(self):
        return self.calculate() * 2

    def calculate(self):
        return self.value + 10

def run{i}():
    instance = Service{i}()
    return instance.process()
"#
        );
        std::fs::write(test_dir.join(format!("service_{i}.py")), content).unwrap();
    }

    group.bench_function("small_codebase", |b| {
        b.iter(|| {
            let analyzer = CodebaseAnalyzer::new();
            let result = analyzer.analyze(black_box(&test_dir));
            black_box(result)
        });
    });

    // Larger tree with cross-module fan-in for scalability testing
    let large_test_dir = std::env::temp_dir().join("codemap_bench_large");
    std::fs::create_dir_all(&large_test_dir).unwrap();

    std::fs::write(
        large_test_dir.join("hub.py"),
        "def core(value):\n    return value + 1\n",
    )
    .unwrap();
    for i in 0..100 {
        let content = format!(
            r#"
from hub import core

def handler{i}(request):
    return core(request)

def helper{i}(x):
    return handler{i}(x)
"#
        );
        std::fs::write(large_test_dir.join(format!("component_{i}.py")), content).unwrap();
    }

    group.bench_function("large_codebase", |b| {
        b.iter(|| {
            let analyzer = CodebaseAnalyzer::new();
            let result = analyzer.analyze(black_box(&large_test_dir));
            black_box(result)
        });
    });

    group.finish();
}

fn benchmark_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_engines");

    let test_dir = std::env::temp_dir().join("codemap_bench_queries");
    std::fs::create_dir_all(&test_dir).unwrap();

    std::fs::write(
        test_dir.join("hub.py"),
        "def core(value):\n    return value + 1\n",
    )
    .unwrap();
    for i in 0..50 {
        let content = format!(
            r#"
from hub import core

def handler{i}(request):
    return core(request)
"#
        );
        std::fs::write(test_dir.join(format!("mod_{i}.py")), content).unwrap();
    }

    let snapshot = CodebaseAnalyzer::new().analyze(&test_dir).unwrap();
    let graph = DependencyGraph::from_snapshot(&snapshot);

    group.bench_function("dependents_unlimited", |b| {
        b.iter(|| {
            let report = get_dependents(black_box(&graph), black_box("hub.core"), 0);
            black_box(report)
        });
    });

    group.bench_function("impact_report", |b| {
        b.iter(|| {
            let report = get_impact_report(black_box(&graph), black_box("hub.core"), true);
            black_box(report)
        });
    });

    group.bench_function("architecture_module", |b| {
        b.iter(|| {
            let report = get_architecture(black_box(&graph), ArchitectureLevel::Module);
            black_box(report)
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_analysis, benchmark_queries);
criterion_main!(benches);
