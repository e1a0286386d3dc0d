//! Query engines over an immutable dependency graph.
//!
//! Each engine is a pure function of a [`DependencyGraph`](crate::core::DependencyGraph)
//! plus query parameters; none of them mutate the graph, so concurrent
//! queries against the same snapshot are safe without locking.

pub mod architecture;
pub mod breaking;
pub mod dependents;
pub mod impact;

pub use architecture::{
    get_architecture, ArchitectureLevel, ArchitectureReport, BucketEdge, Hotspot, HotspotRisk,
    ModuleSummary,
};
pub use breaking::{check_breaking_change, parse_signature, BreakingChangeReport, Parameter};
pub use dependents::{get_dependents, DependentsReport, SymbolRef};
pub use impact::{get_impact_report, ImpactReport, RiskLevel};
