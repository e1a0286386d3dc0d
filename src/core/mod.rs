pub mod analyzer;
pub mod graph;
pub mod resolver;
pub mod scanner;
pub mod snapshot;
pub mod symbols;

pub use analyzer::CodebaseAnalyzer;
pub use graph::DependencyGraph;
pub use resolver::ReferenceResolver;
pub use scanner::FileScanner;
pub use snapshot::{CodeMapSnapshot, Dependency, DependencyKind};
pub use symbols::{RawReference, ReferenceKind, Symbol, SymbolKind, SymbolTable};
