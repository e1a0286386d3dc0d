use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Module,
    Class,
    Function,
    Method,
}

/// A declared code entity with a globally unique qualified name.
///
/// `file` and `line` are informational only and are not part of the
/// symbol's identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Symbol {
    pub qualified_name: String,
    pub kind: SymbolKind,
    pub file: String,
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Symbol {
    pub fn new(qualified_name: String, kind: SymbolKind, file: String, line: usize) -> Self {
        Self {
            qualified_name,
            kind,
            file,
            line,
            docstring: None,
            signature: None,
        }
    }

    pub fn with_docstring(mut self, docstring: String) -> Self {
        self.docstring = Some(docstring);
        self
    }

    pub fn with_signature(mut self, signature: String) -> Self {
        self.signature = Some(signature);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Call,
    Import,
    Inherit,
}

/// An unresolved reference emitted by the extraction front-end.
///
/// `name` is either a bare identifier (`helper`) or a dotted name
/// (`auth.validate`). The resolver maps it to a declared symbol or drops it.
#[derive(Debug, Clone)]
pub struct RawReference {
    pub from_sym: String,
    pub name: String,
    pub kind: ReferenceKind,
    pub file: String,
    pub line: usize,
}

/// Declaration-ordered symbol table.
///
/// Insertion order is the resolution order for ambiguous suffix matches, so
/// callers must feed files in a deterministic order. On a duplicate
/// qualified name the later declaration is dropped.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_name: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol, returning false if a symbol with the same qualified
    /// name was already declared (the new one is dropped).
    pub fn insert(&mut self, symbol: Symbol) -> bool {
        if self.by_name.contains_key(&symbol.qualified_name) {
            tracing::warn!(
                qualified_name = %symbol.qualified_name,
                file = %symbol.file,
                line = symbol.line,
                "duplicate symbol declaration dropped"
            );
            return false;
        }
        self.by_name
            .insert(symbol.qualified_name.clone(), self.symbols.len());
        self.symbols.push(symbol);
        true
    }

    pub fn get(&self, qualified_name: &str) -> Option<&Symbol> {
        self.by_name
            .get(qualified_name)
            .map(|&idx| &self.symbols[idx])
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.by_name.contains_key(qualified_name)
    }

    /// Symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn into_symbols(self) -> Vec<Symbol> {
        self.symbols
    }
}
