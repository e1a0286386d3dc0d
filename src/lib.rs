//! # CODEMAP
//!
//! Dependency-graph construction and analysis for codebases.
//!
//! CODEMAP extracts a symbol table and a directed call/import/inheritance
//! graph from Python source, persists it as a JSON snapshot, and answers
//! four query classes against the graph:
//!
//! - **Dependents**: direct and transitive callers of a symbol, with depth
//!   limiting
//! - **Impact**: blast radius with a 0-100 risk score and suggested test
//!   files
//! - **Breaking change**: signature diffing that classifies a proposed edit
//!   as breaking or safe and partitions callers accordingly
//! - **Architecture**: module/package rollups with hotspot and cycle
//!   detection

pub mod analysis;
pub mod core;
pub mod error;
pub mod parsers;
pub mod store;
