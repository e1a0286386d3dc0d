use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use codemap::analysis::{
    check_breaking_change, get_architecture, get_dependents, get_impact_report, ArchitectureLevel,
};
use codemap::core::{CodeMapSnapshot, CodebaseAnalyzer, DependencyGraph};
use codemap::store::SnapshotStore;

#[derive(Debug, Parser)]
#[command(
    name = "codemap",
    version,
    about = "Dependency-graph analysis: what depends on this, and what breaks if I change it?"
)]
struct Cli {
    /// Snapshot storage directory
    #[arg(long, value_name = "DIR", default_value = ".codemap", global = true)]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a source tree and store its snapshot
    Analyze {
        /// Input directory to analyze
        #[arg(short, long, value_name = "PATH")]
        input: PathBuf,

        /// Project identifier the snapshot is stored under
        #[arg(short, long, value_name = "NAME")]
        project: String,
    },

    /// List projects with a stored snapshot
    Projects,

    /// Direct and transitive dependents of a symbol
    Dependents {
        #[arg(short, long, value_name = "NAME")]
        project: String,

        /// Fully qualified symbol name
        symbol: String,

        /// Traversal depth; 0 means unlimited
        #[arg(short, long, default_value_t = 0)]
        depth: usize,
    },

    /// Blast-radius impact report for a symbol
    Impact {
        #[arg(short, long, value_name = "NAME")]
        project: String,

        /// Fully qualified symbol name
        symbol: String,

        /// Include suggested test files
        #[arg(long)]
        tests: bool,
    },

    /// Classify a proposed signature change as breaking or safe
    Breaking {
        #[arg(short, long, value_name = "NAME")]
        project: String,

        /// Fully qualified symbol name
        symbol: String,

        /// Proposed new signature text
        signature: String,
    },

    /// Module/package rollup with hotspots and cycles
    Architecture {
        #[arg(short, long, value_name = "NAME")]
        project: String,

        /// Aggregation granularity
        #[arg(short, long, value_enum, default_value_t = LevelArg::Module)]
        level: LevelArg,
    },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, clap::ValueEnum)]
#[value(rename_all = "kebab-case")]
enum LevelArg {
    Module,
    Package,
}

impl From<LevelArg> for ArchitectureLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Module => ArchitectureLevel::Module,
            LevelArg::Package => ArchitectureLevel::Package,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("codemap=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let store = SnapshotStore::new(cli.store);

    match cli.command {
        Command::Analyze { input, project } => {
            let start = Instant::now();
            let analyzer = CodebaseAnalyzer::new();
            let snapshot = analyzer.analyze(&input)?;
            let path = store.save(&project, &snapshot)?;
            eprintln!(
                "Analyzed {} symbol(s), {} dependency edge(s) in {:.2}s -> {}",
                snapshot.symbols.len(),
                snapshot.dependencies.len(),
                start.elapsed().as_secs_f64(),
                path.display()
            );
        }
        Command::Projects => {
            for project in store.list()? {
                println!("{project}");
            }
        }
        Command::Dependents {
            project,
            symbol,
            depth,
        } => {
            let graph = load_graph(&store, &project)?;
            let report = get_dependents(&graph, &symbol, depth)?;
            print_json(&report)?;
        }
        Command::Impact {
            project,
            symbol,
            tests,
        } => {
            let graph = load_graph(&store, &project)?;
            let report = get_impact_report(&graph, &symbol, tests)?;
            print_json(&report)?;
        }
        Command::Breaking {
            project,
            symbol,
            signature,
        } => {
            let graph = load_graph(&store, &project)?;
            let report = check_breaking_change(&graph, &symbol, &signature)?;
            print_json(&report)?;
        }
        Command::Architecture { project, level } => {
            let graph = load_graph(&store, &project)?;
            let report = get_architecture(&graph, level.into());
            print_json(&report)?;
        }
    }

    Ok(())
}

fn load_graph(store: &SnapshotStore, project: &str) -> Result<DependencyGraph> {
    let snapshot: CodeMapSnapshot = store.load(project)?;
    Ok(DependencyGraph::from_snapshot(&snapshot))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
