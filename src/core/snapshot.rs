use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::symbols::Symbol;
use crate::error::{CodemapError, CodemapResult};

pub const SNAPSHOT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Calls,
    Imports,
    Inherits,
}

/// A resolved relationship between two declared symbols.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub from_sym: String,
    pub to_sym: String,
    pub kind: DependencyKind,
}

impl Dependency {
    pub fn new(from_sym: String, to_sym: String, kind: DependencyKind) -> Self {
        Self {
            from_sym,
            to_sym,
            kind,
        }
    }
}

/// The serialized unit exchanged with storage and query layers.
///
/// Immutable once produced: graph construction and every analysis engine
/// treat it as read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeMapSnapshot {
    pub version: String,
    pub generated_at: String,
    pub source_root: String,
    pub symbols: Vec<Symbol>,
    pub dependencies: Vec<Dependency>,
}

impl CodeMapSnapshot {
    pub fn new(source_root: String, symbols: Vec<Symbol>, dependencies: Vec<Dependency>) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            source_root,
            symbols,
            dependencies,
        }
    }

    /// Structural validation of the snapshot invariants: unique qualified
    /// names and edges that reference declared symbols only.
    pub fn validate(&self) -> CodemapResult<()> {
        if self.version.is_empty() {
            return Err(CodemapError::Snapshot("version must not be empty".into()));
        }

        let mut names: HashSet<&str> = HashSet::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            if symbol.qualified_name.is_empty() {
                return Err(CodemapError::Snapshot(
                    "symbol with empty qualified_name".into(),
                ));
            }
            if !names.insert(&symbol.qualified_name) {
                return Err(CodemapError::Snapshot(format!(
                    "duplicate qualified_name: {}",
                    symbol.qualified_name
                )));
            }
        }

        for dep in &self.dependencies {
            if !names.contains(dep.from_sym.as_str()) {
                return Err(CodemapError::Snapshot(format!(
                    "dependency references undeclared symbol: {}",
                    dep.from_sym
                )));
            }
            if !names.contains(dep.to_sym.as_str()) {
                return Err(CodemapError::Snapshot(format!(
                    "dependency references undeclared symbol: {}",
                    dep.to_sym
                )));
            }
        }

        Ok(())
    }

    pub fn to_json(&self) -> CodemapResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(data: &str) -> CodemapResult<Self> {
        let snapshot: Self = serde_json::from_str(data)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
