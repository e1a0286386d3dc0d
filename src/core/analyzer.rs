use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::resolver::ReferenceResolver;
use crate::core::scanner::FileScanner;
use crate::core::snapshot::CodeMapSnapshot;
use crate::core::symbols::{RawReference, SymbolTable};
use crate::parsers::{FileExtraction, LanguageParser, PythonParser};
use crate::error::CodemapResult;

/// End-to-end snapshot construction: scan, extract per file in parallel,
/// merge into a declaration-ordered symbol table, resolve references.
pub struct CodebaseAnalyzer {
    scanner: FileScanner,
}

impl CodebaseAnalyzer {
    pub fn new() -> Self {
        Self {
            scanner: FileScanner::new(),
        }
    }

    pub fn analyze(&self, root: &Path) -> CodemapResult<CodeMapSnapshot> {
        let files = self.scanner.scan(root)?;
        tracing::info!(files = files.len(), root = %root.display(), "scan complete");

        // Extraction is embarrassingly parallel: files share no mutable
        // state. A per-file failure is logged and skipped; it never aborts
        // the run. Order of results follows the sorted file list.
        let extractions: Vec<FileExtraction> = files
            .par_iter()
            .filter_map(|path| self.extract_file(root, path))
            .collect();

        let mut table = SymbolTable::new();
        let mut references: Vec<RawReference> = Vec::new();
        for extraction in extractions {
            for symbol in extraction.symbols {
                table.insert(symbol);
            }
            references.extend(extraction.references);
        }

        let resolver = ReferenceResolver::new(&table);
        let dependencies = resolver.resolve_all(&references);

        tracing::info!(
            symbols = table.len(),
            references = references.len(),
            dependencies = dependencies.len(),
            "analysis complete"
        );

        let snapshot = CodeMapSnapshot::new(
            root.display().to_string(),
            table.into_symbols(),
            dependencies,
        );
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn extract_file(&self, root: &Path, path: &PathBuf) -> Option<FileExtraction> {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let relative = relative.to_string_lossy().replace('\\', "/");

        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(error) => {
                tracing::warn!(file = %relative, %error, "skipping unreadable file");
                return None;
            }
        };

        let parser = PythonParser::new();
        match parser.extract(&source, &relative) {
            Ok(extraction) => Some(extraction),
            Err(error) => {
                tracing::warn!(file = %relative, %error, "skipping unparsable file");
                None
            }
        }
    }
}

impl Default for CodebaseAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
