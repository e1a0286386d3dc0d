use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::graph::DependencyGraph;
use crate::core::symbols::Symbol;
use crate::error::{CodemapError, CodemapResult};

/// A dependent symbol with its source location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolRef {
    pub symbol: String,
    pub file: String,
    pub line: usize,
}

impl SymbolRef {
    pub fn from_symbol(symbol: &Symbol) -> Self {
        Self {
            symbol: symbol.qualified_name.clone(),
            file: symbol.file.clone(),
            line: symbol.line,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependentsReport {
    pub symbol: String,
    pub direct: Vec<SymbolRef>,
    pub transitive: Vec<SymbolRef>,
    pub total: usize,
}

/// Direct and transitive dependents of `symbol` via reverse-adjacency BFS.
///
/// `depth = 0` means unlimited; `depth = 1` stops after direct callers. The
/// visited set is seeded with the queried symbol and its direct callers, so
/// cycles terminate and no symbol is emitted twice.
pub fn get_dependents(
    graph: &DependencyGraph,
    symbol: &str,
    depth: usize,
) -> CodemapResult<DependentsReport> {
    if !graph.contains(symbol) {
        return Err(CodemapError::SymbolNotFound(symbol.to_string()));
    }

    let direct: Vec<&Symbol> = graph.callers_of(symbol);

    let mut visited: HashSet<&str> = HashSet::with_capacity(direct.len() + 1);
    visited.insert(symbol);
    for caller in &direct {
        visited.insert(&caller.qualified_name);
    }

    let mut transitive: Vec<SymbolRef> = Vec::new();
    let mut frontier: Vec<&Symbol> = direct.clone();
    let mut level = 1usize;

    while !frontier.is_empty() {
        if depth != 0 && level >= depth {
            break;
        }
        let mut next: Vec<&Symbol> = Vec::new();
        for current in frontier {
            for caller in graph.callers_of(&current.qualified_name) {
                if visited.insert(&caller.qualified_name) {
                    transitive.push(SymbolRef::from_symbol(caller));
                    next.push(caller);
                }
            }
        }
        frontier = next;
        level += 1;
    }

    transitive.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    let direct: Vec<SymbolRef> = direct.iter().map(|s| SymbolRef::from_symbol(s)).collect();
    let total = direct.len() + transitive.len();

    Ok(DependentsReport {
        symbol: symbol.to_string(),
        direct,
        transitive,
        total,
    })
}
