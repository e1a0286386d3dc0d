pub mod common;
pub mod python;

pub use python::PythonParser;

use crate::core::symbols::{RawReference, Symbol};
use crate::error::CodemapResult;

/// Symbols and unresolved references extracted from a single source file.
#[derive(Debug, Default)]
pub struct FileExtraction {
    pub symbols: Vec<Symbol>,
    pub references: Vec<RawReference>,
}

pub trait LanguageParser {
    /// Extract declared symbols and raw references from one source file.
    /// `file` is the path relative to the source root; it determines the
    /// module qualified name.
    fn extract(&self, source: &str, file: &str) -> CodemapResult<FileExtraction>;

    fn language_name(&self) -> &str;
}

/// Module qualified name for a relative file path:
/// `api/middleware.py` -> `api.middleware`.
pub fn module_name_for(file: &str) -> String {
    let trimmed = file
        .strip_suffix(".py")
        .or_else(|| file.strip_suffix(".pyi"))
        .unwrap_or(file);
    trimmed.replace(['/', '\\'], ".")
}
