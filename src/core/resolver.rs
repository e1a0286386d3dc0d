use std::collections::{HashMap, HashSet};

use crate::core::snapshot::{Dependency, DependencyKind};
use crate::core::symbols::{RawReference, ReferenceKind, Symbol, SymbolTable};

/// Python built-ins and keywords that are never resolved to a declared
/// symbol, even when a symbol coincidentally shares the name.
const DENYLIST: &[&str] = &[
    "abs", "all", "any", "bool", "bytes", "callable", "dict", "dir", "enumerate", "filter",
    "float", "format", "frozenset", "getattr", "hasattr", "hash", "id", "int", "isinstance",
    "issubclass", "iter", "len", "list", "map", "max", "min", "next", "object", "open", "print",
    "range", "repr", "reversed", "round", "set", "setattr", "sorted", "str", "sum", "super",
    "tuple", "type", "vars", "zip", "Exception", "ValueError", "TypeError", "KeyError",
    "RuntimeError", "NotImplementedError", "StopIteration",
];

/// Heuristic name-based resolver mapping raw references to declared symbols.
///
/// Resolution is an ordered list of strategies with early exit:
/// 1. denylisted built-ins are never resolved;
/// 2. exact qualified-name match;
/// 3. suffix match `.{name}` — when several symbols match, the first one in
///    declaration order wins (a documented heuristic, not a correctness
///    guarantee);
/// 4. no match: the reference is dropped without error.
pub struct ReferenceResolver<'a> {
    table: &'a SymbolTable,
    /// Final name segment -> symbol indices in declaration order.
    by_last_segment: HashMap<&'a str, Vec<usize>>,
    declaration_order: Vec<&'a Symbol>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        let declaration_order: Vec<&Symbol> = table.iter().collect();
        let mut by_last_segment: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, symbol) in declaration_order.iter().enumerate() {
            let last = symbol
                .qualified_name
                .rsplit('.')
                .next()
                .unwrap_or(&symbol.qualified_name);
            by_last_segment.entry(last).or_default().push(idx);
        }
        Self {
            table,
            by_last_segment,
            declaration_order,
        }
    }

    /// Resolve one raw reference to a declared symbol, or None to drop it.
    pub fn resolve(&self, name: &str) -> Option<&'a Symbol> {
        if DENYLIST.contains(&name) {
            return None;
        }

        if let Some(symbol) = self.table.get(name) {
            return Some(symbol);
        }

        // Suffix match on the full dotted reference. Candidates are indexed
        // by their final segment, so only symbols that could match are
        // scanned, in declaration order.
        let last = name.rsplit('.').next().unwrap_or(name);
        let suffix = format!(".{name}");
        let candidates = self.by_last_segment.get(last)?;
        candidates
            .iter()
            .map(|&idx| self.declaration_order[idx])
            .find(|symbol| symbol.qualified_name.ends_with(&suffix))
    }

    /// Resolve a batch of raw references into deduplicated dependency edges.
    /// Unresolvable references are dropped silently.
    pub fn resolve_all(&self, references: &[RawReference]) -> Vec<Dependency> {
        let mut seen: HashSet<(String, String, DependencyKind)> = HashSet::new();
        let mut edges = Vec::new();

        for reference in references {
            let Some(target) = self.resolve(&reference.name) else {
                tracing::debug!(
                    name = %reference.name,
                    from = %reference.from_sym,
                    "unresolved reference dropped"
                );
                continue;
            };

            let kind = match reference.kind {
                ReferenceKind::Call => DependencyKind::Calls,
                ReferenceKind::Import => DependencyKind::Imports,
                ReferenceKind::Inherit => DependencyKind::Inherits,
            };

            let key = (
                reference.from_sym.clone(),
                target.qualified_name.clone(),
                kind,
            );
            if seen.insert(key) {
                edges.push(Dependency::new(
                    reference.from_sym.clone(),
                    target.qualified_name.clone(),
                    kind,
                ));
            }
        }

        edges
    }
}
