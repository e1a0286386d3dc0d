use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

use crate::core::snapshot::{CodeMapSnapshot, DependencyKind};
use crate::core::symbols::Symbol;

/// The resolved symbol set with both adjacency directions, built once from
/// an immutable snapshot. Construction is O(E); lookups are keyed by
/// qualified name.
pub struct DependencyGraph {
    graph: DiGraph<Symbol, DependencyKind>,
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn from_snapshot(snapshot: &CodeMapSnapshot) -> Self {
        let mut graph = DiGraph::with_capacity(snapshot.symbols.len(), snapshot.dependencies.len());
        let mut node_map = HashMap::with_capacity(snapshot.symbols.len());

        for symbol in &snapshot.symbols {
            if node_map.contains_key(&symbol.qualified_name) {
                continue;
            }
            let idx = graph.add_node(symbol.clone());
            node_map.insert(symbol.qualified_name.clone(), idx);
        }

        // Unresolved references were never materialized as dependencies, so
        // both endpoints are expected to exist; anything else is skipped.
        for dep in &snapshot.dependencies {
            let (Some(&from), Some(&to)) = (node_map.get(&dep.from_sym), node_map.get(&dep.to_sym))
            else {
                continue;
            };
            graph.add_edge(from, to, dep.kind);
        }

        Self { graph, node_map }
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.node_map.contains_key(qualified_name)
    }

    pub fn get(&self, qualified_name: &str) -> Option<&Symbol> {
        self.node_map
            .get(qualified_name)
            .map(|&idx| &self.graph[idx])
    }

    /// Symbols with an edge pointing at `qualified_name`, sorted by name.
    pub fn callers_of(&self, qualified_name: &str) -> Vec<&Symbol> {
        self.neighbors(qualified_name, Direction::Incoming)
    }

    /// Symbols `qualified_name` points at, sorted by name.
    pub fn callees_of(&self, qualified_name: &str) -> Vec<&Symbol> {
        self.neighbors(qualified_name, Direction::Outgoing)
    }

    fn neighbors(&self, qualified_name: &str, direction: Direction) -> Vec<&Symbol> {
        let Some(&idx) = self.node_map.get(qualified_name) else {
            return Vec::new();
        };
        let mut neighbors: Vec<&Symbol> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| &self.graph[n])
            .collect();
        neighbors.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        // Parallel edges (e.g. calls + imports) yield the neighbor twice.
        neighbors.dedup_by(|a, b| a.qualified_name == b.qualified_name);
        neighbors
    }

    pub fn all_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.graph.node_weights()
    }

    /// All resolved edges as (from, to, kind) triples.
    pub fn edges(&self) -> impl Iterator<Item = (&Symbol, &Symbol, DependencyKind)> {
        self.graph.edge_indices().filter_map(move |e| {
            let (from, to) = self.graph.edge_endpoints(e)?;
            Some((&self.graph[from], &self.graph[to], self.graph[e]))
        })
    }

    pub fn symbol_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
