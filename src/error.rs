use thiserror::Error;

/// Top-level error enum for the codemap library.
///
/// Engine-level failures (`ProjectNotFound`, `SymbolNotFound`) are returned
/// to the caller as typed values and never swallowed. Per-file extraction
/// failures are not represented here: they are logged and skipped so a
/// single bad source file cannot abort a whole-project analysis.
#[derive(Debug, Error)]
pub enum CodemapError {
    #[error("no snapshot found for project: {0}")]
    ProjectNotFound(String),

    #[error("symbol not found in graph: {0}")]
    SymbolNotFound(String),

    #[error("extraction error: {0}")]
    Extraction(String),

    #[error("invalid snapshot: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CodemapResult<T> = Result<T, CodemapError>;
