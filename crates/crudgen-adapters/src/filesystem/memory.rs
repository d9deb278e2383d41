//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use crudgen_core::{
    application::{ApplicationError, ports::Filesystem},
    error::CrudgenResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can hand one clone to a service and
/// inspect the other.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    /// Paths whose reads and writes fail, to exercise error isolation.
    denied: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Seed a file, creating its parent directories.
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                insert_ancestors(&mut inner.directories, parent);
            }
            inner.files.insert(path, content.into());
        }
        self
    }

    /// Seed an empty directory and its ancestors.
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            insert_ancestors(&mut inner.directories, path.as_ref());
        }
        self
    }

    /// Make every read and write of `path` fail.
    pub fn deny(&self, path: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.denied.insert(path.into());
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<_> = self
            .inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default();
        files.sort();
        files
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
            inner.denied.clear();
        }
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_ancestors(directories: &mut HashSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> CrudgenResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::FilesystemLock)?;

        if inner.denied.contains(path) {
            return Err(ApplicationError::file_io(path, "Permission denied").into());
        }
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::file_io(path, "No such file").into())
    }

    fn write_file(&self, path: &Path, content: &str) -> CrudgenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::FilesystemLock)?;

        if inner.denied.contains(path) {
            return Err(ApplicationError::file_io(path, "Permission denied").into());
        }

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(
                    ApplicationError::file_io(path, "Parent directory does not exist").into(),
                );
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new().with_dir("m/recipes");
        let other = fs.clone();
        fs.write_file(Path::new("m/recipes/a.go"), "x").unwrap();
        assert_eq!(other.read_file(Path::new("m/recipes/a.go")).as_deref(), Some("x"));
        assert!(other.exists(Path::new("m")));
    }

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("nope/a.go"), "x").is_err());
    }

    #[test]
    fn denied_paths_fail() {
        let fs = MemoryFilesystem::new().with_file("a.go", "x");
        fs.deny("a.go");
        assert!(fs.read_to_string(Path::new("a.go")).is_err());
        assert!(fs.write_file(Path::new("a.go"), "y").is_err());
    }

    #[test]
    fn seeded_file_is_readable() {
        let fs = MemoryFilesystem::new().with_file("m/r/c_test.go", "package r\n");
        assert_eq!(fs.read_to_string(Path::new("m/r/c_test.go")).unwrap(), "package r\n");
        assert_eq!(fs.list_files(), [PathBuf::from("m/r/c_test.go")]);
    }
}
