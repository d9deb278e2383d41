//! Finds controller test files to patch under a directory tree.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crudgen_core::domain::ArtifactKind;

/// Walks a tree for files with a given name.
#[derive(Debug, Clone)]
pub struct TestFileScanner {
    file_name: String,
}

impl TestFileScanner {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Scanner for generated controller tests (`controller_test.go`).
    pub fn controllers() -> Self {
        Self::new(ArtifactKind::Controller.file_name())
    }

    /// Every matching file under `root`, sorted. Unreadable entries are
    /// skipped with a warning.
    #[instrument(skip(self), fields(root = %root.display(), file = %self.file_name))]
    pub fn scan(&self, root: &Path) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for entry in WalkDir::new(root).min_depth(1) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && entry.file_name() == self.file_name.as_str() {
                debug!(path = %entry.path().display(), "found");
                found.push(entry.into_path());
            }
        }
        found.sort();
        found
    }
}

impl Default for TestFileScanner {
    fn default() -> Self {
        Self::controllers()
    }
}
