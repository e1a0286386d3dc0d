use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use crate::core::graph::DependencyGraph;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArchitectureLevel {
    Module,
    Package,
}

impl fmt::Display for ArchitectureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchitectureLevel::Module => f.write_str("module"),
            ArchitectureLevel::Package => f.write_str("package"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleSummary {
    pub name: String,
    pub symbols: usize,
    pub dependents: usize,
    pub dependencies: usize,
}

/// A weighted bucket-level edge; `count` is the number of symbol-level
/// edges that rolled up into it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketEdge {
    pub from: String,
    pub to: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HotspotRisk {
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hotspot {
    pub name: String,
    pub dependents: usize,
    pub risk: HotspotRisk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchitectureReport {
    pub level: ArchitectureLevel,
    pub modules: Vec<ModuleSummary>,
    pub dependencies: Vec<BucketEdge>,
    pub hotspots: Vec<Hotspot>,
    pub cycles: Vec<Vec<String>>,
    pub summary: String,
}

const HOTSPOT_THRESHOLD: usize = 5;
const HOTSPOT_HIGH_THRESHOLD: usize = 10;

/// File path -> aggregation bucket. Module granularity keeps the full path
/// minus its extension; package granularity keeps the top-level path
/// segment (extension-stripped when the path has no directory part).
fn bucket_for(file: &str, level: ArchitectureLevel) -> String {
    match level {
        ArchitectureLevel::Module => strip_extension(file).to_string(),
        ArchitectureLevel::Package => match file.split_once('/') {
            Some((first, _)) => first.to_string(),
            None => strip_extension(file).to_string(),
        },
    }
}

fn strip_extension(file: &str) -> &str {
    match file.rfind('.') {
        Some(idx) if idx > file.rfind('/').map_or(0, |s| s + 1) => &file[..idx],
        _ => file,
    }
}

/// Roll the symbol graph up to `level` granularity: per-bucket symbol
/// counts, weighted bucket edges, in/out degrees, hotspots, and cycles.
pub fn get_architecture(graph: &DependencyGraph, level: ArchitectureLevel) -> ArchitectureReport {
    let mut symbol_counts: BTreeMap<String, usize> = BTreeMap::new();
    for symbol in graph.all_symbols() {
        *symbol_counts
            .entry(bucket_for(&symbol.file, level))
            .or_insert(0) += 1;
    }

    // Same-bucket edges carry no architectural signal and are dropped.
    let mut edge_counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for (from, to, _kind) in graph.edges() {
        let from_bucket = bucket_for(&from.file, level);
        let to_bucket = bucket_for(&to.file, level);
        if from_bucket == to_bucket {
            continue;
        }
        *edge_counts.entry((from_bucket, to_bucket)).or_insert(0) += 1;
    }

    let mut in_degree: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut out_degree: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (from, to) in edge_counts.keys() {
        in_degree.entry(to).or_default().insert(from);
        out_degree.entry(from).or_default().insert(to);
    }

    let modules: Vec<ModuleSummary> = symbol_counts
        .iter()
        .map(|(name, &symbols)| ModuleSummary {
            name: name.clone(),
            symbols,
            dependents: in_degree.get(name.as_str()).map_or(0, BTreeSet::len),
            dependencies: out_degree.get(name.as_str()).map_or(0, BTreeSet::len),
        })
        .collect();

    let dependencies: Vec<BucketEdge> = edge_counts
        .iter()
        .map(|((from, to), &count)| BucketEdge {
            from: from.clone(),
            to: to.clone(),
            count,
        })
        .collect();

    let mut hotspots: Vec<Hotspot> = modules
        .iter()
        .filter(|m| m.dependents > HOTSPOT_THRESHOLD)
        .map(|m| Hotspot {
            name: m.name.clone(),
            dependents: m.dependents,
            risk: if m.dependents > HOTSPOT_HIGH_THRESHOLD {
                HotspotRisk::High
            } else {
                HotspotRisk::Medium
            },
        })
        .collect();
    hotspots.sort_by(|a, b| b.dependents.cmp(&a.dependents).then(a.name.cmp(&b.name)));

    let cycles = find_cycles(&out_degree);

    let summary = format!(
        "{} {level}(s), {} cross-{level} dependency edge(s), {} hotspot(s), {} cycle(s)",
        modules.len(),
        dependencies.len(),
        hotspots.len(),
        cycles.len()
    );

    ArchitectureReport {
        level,
        modules,
        dependencies,
        hotspots,
        cycles,
        summary,
    }
}

/// Iterative DFS cycle detection over the bucket graph.
///
/// When a neighbor already on the active stack is seen, the path slice
/// from that neighbor to the current node is one cycle. Cycles with the
/// same node set (regardless of rotation) are deduplicated by a
/// sorted-node-set key. An explicit stack keeps large bucket graphs from
/// overflowing the call stack.
fn find_cycles(adjacency: &BTreeMap<&str, BTreeSet<&str>>) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = Vec::new();
    let mut seen_sets: HashSet<Vec<String>> = HashSet::new();
    let mut visited: HashSet<&str> = HashSet::new();

    for &start in adjacency.keys() {
        if visited.contains(start) {
            continue;
        }

        // Each stack frame is a node plus an iterator over its remaining
        // neighbors, mirroring the recursive formulation.
        let mut path: Vec<&str> = vec![start];
        let mut on_stack: HashSet<&str> = HashSet::from([start]);
        let mut frames: Vec<std::collections::btree_set::Iter<'_, &str>> = vec![neighbors(adjacency, start)];
        visited.insert(start);

        while let Some(frame) = frames.last_mut() {
            match frame.next() {
                Some(&next) => {
                    if on_stack.contains(next) {
                        let from = path.iter().position(|&n| n == next).unwrap_or(0);
                        let cycle: Vec<String> =
                            path[from..].iter().map(|n| n.to_string()).collect();
                        let mut key = cycle.clone();
                        key.sort();
                        if seen_sets.insert(key) {
                            cycles.push(cycle);
                        }
                    } else if visited.insert(next) {
                        path.push(next);
                        on_stack.insert(next);
                        frames.push(neighbors(adjacency, next));
                    }
                }
                None => {
                    frames.pop();
                    if let Some(done) = path.pop() {
                        on_stack.remove(done);
                    }
                }
            }
        }
    }

    cycles
}

fn neighbors<'a>(
    adjacency: &'a BTreeMap<&str, BTreeSet<&'a str>>,
    node: &str,
) -> std::collections::btree_set::Iter<'a, &'a str> {
    static EMPTY: BTreeSet<&str> = BTreeSet::new();
    adjacency.get(node).unwrap_or(&EMPTY).iter()
}
