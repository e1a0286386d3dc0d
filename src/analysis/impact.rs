use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use super::dependents::{get_dependents, SymbolRef};
use crate::core::graph::DependencyGraph;
use crate::error::CodemapResult;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=19 => RiskLevel::Low,
            20..=39 => RiskLevel::Medium,
            40..=69 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactReport {
    pub symbol: String,
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    pub direct_dependents: Vec<SymbolRef>,
    pub transitive_dependents: Vec<SymbolRef>,
    pub affected_files: Vec<String>,
    pub suggested_tests: Vec<String>,
    pub summary: String,
}

/// Blast-radius report for a change to `symbol`, built on unlimited-depth
/// dependents traversal.
///
/// Each risk term is pre-clamped, so the score is always in `[0, 100]`.
pub fn get_impact_report(
    graph: &DependencyGraph,
    symbol: &str,
    include_tests: bool,
) -> CodemapResult<ImpactReport> {
    let dependents = get_dependents(graph, symbol, 0)?;

    let affected_files: BTreeSet<String> = dependents
        .direct
        .iter()
        .chain(dependents.transitive.iter())
        .map(|entry| entry.file.clone())
        .collect();

    let direct_count = dependents.direct.len() as u32;
    let transitive_count = dependents.transitive.len() as u32;
    let file_count = affected_files.len() as u32;

    let risk_score = (direct_count * 10).min(40)
        + (transitive_count * 5).min(30)
        + (file_count * 5).min(30);
    let risk_level = RiskLevel::from_score(risk_score);

    let suggested_tests = if include_tests {
        suggest_test_files(&affected_files)
    } else {
        Vec::new()
    };

    let summary = format!(
        "{risk_level} risk ({risk_score}/100): {direct_count} direct dependent(s), \
         {transitive_count} transitive, {file_count} file(s) affected"
    );

    Ok(ImpactReport {
        symbol: dependents.symbol,
        risk_score,
        risk_level,
        direct_dependents: dependents.direct,
        transitive_dependents: dependents.transitive,
        affected_files: affected_files.into_iter().collect(),
        suggested_tests,
        summary,
    })
}

/// Conventional test-file name variants for each affected file. This is a
/// naming convention, not an existence check; callers may filter the list
/// against the real filesystem.
fn suggest_test_files(affected_files: &BTreeSet<String>) -> Vec<String> {
    let mut suggested: BTreeSet<String> = BTreeSet::new();
    for file in affected_files {
        let path = Path::new(file);
        let Some(basename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(basename);
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("py");

        let variants = [format!("{stem}_test.{ext}"), format!("test_{basename}")];
        for variant in variants {
            let suggestion = match parent {
                Some(parent) => format!("{}/{variant}", parent.display()),
                None => variant,
            };
            suggested.insert(suggestion);
        }
    }
    suggested.into_iter().collect()
}
