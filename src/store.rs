use std::fs;
use std::path::{Path, PathBuf};

use crate::core::snapshot::CodeMapSnapshot;
use crate::error::{CodemapError, CodemapResult};

/// On-disk snapshot storage, one JSON file per project under a root
/// directory. Snapshots are validated both on save and on load, so a graph
/// is never built from an internally inconsistent file.
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, project: &str) -> CodemapResult<PathBuf> {
        // Project identifiers become file names, so path separators and
        // anything else exotic are rejected outright.
        let valid = !project.is_empty()
            && project
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(CodemapError::Snapshot(format!(
                "invalid project identifier: {project:?}"
            )));
        }
        Ok(self.root.join(format!("{project}.json")))
    }

    pub fn save(&self, project: &str, snapshot: &CodeMapSnapshot) -> CodemapResult<PathBuf> {
        snapshot.validate()?;
        let path = self.path_for(project)?;
        fs::create_dir_all(&self.root)?;
        fs::write(&path, snapshot.to_json()?)?;
        tracing::info!(project, path = %path.display(), "snapshot saved");
        Ok(path)
    }

    pub fn load(&self, project: &str) -> CodemapResult<CodeMapSnapshot> {
        let path = self.path_for(project)?;
        if !path.is_file() {
            return Err(CodemapError::ProjectNotFound(project.to_string()));
        }
        let raw = fs::read_to_string(&path)?;
        let snapshot = CodeMapSnapshot::from_json(&raw)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Project identifiers with a stored snapshot, sorted.
    pub fn list(&self) -> CodemapResult<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut projects: Vec<String> = fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("json") {
                    path.file_stem()
                        .and_then(|s| s.to_str())
                        .map(|s| s.to_string())
                } else {
                    None
                }
            })
            .collect();
        projects.sort();
        Ok(projects)
    }
}
