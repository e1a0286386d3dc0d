use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::CodemapResult;

/// Directories never descended into during a scan.
const EXCLUDED_DIRS: &[&str] = &["__pycache__", ".venv", "venv", "node_modules"];

pub struct FileScanner;

impl FileScanner {
    pub fn new() -> Self {
        Self
    }

    /// Collect Python source files under `root`, sorted by path so the
    /// downstream symbol table gets a deterministic declaration order.
    pub fn scan(&self, root: &Path) -> CodemapResult<Vec<PathBuf>> {
        let entries: Vec<DirEntry> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !Self::is_excluded(entry))
            .filter_map(|e| e.ok())
            .filter(|entry| entry.path().is_file())
            .collect();

        let mut files: Vec<PathBuf> = entries
            .par_iter()
            .filter_map(|entry| {
                let path = entry.path();
                match path.extension().and_then(|ext| ext.to_str()) {
                    Some("py") => Some(path.to_path_buf()),
                    _ => None,
                }
            })
            .collect();

        files.sort();
        Ok(files)
    }

    fn is_excluded(entry: &DirEntry) -> bool {
        if !entry.path().is_dir() {
            return false;
        }
        let Some(name) = entry.file_name().to_str() else {
            return true;
        };
        // Keep "." and "./" roots; skip hidden directories below them.
        (name.starts_with('.') && name.len() > 1 && entry.depth() > 0)
            || EXCLUDED_DIRS.contains(&name)
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}
