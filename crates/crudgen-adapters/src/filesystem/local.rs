//! Local filesystem adapter using std::fs.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crudgen_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{CrudgenError, CrudgenResult},
};

/// Production filesystem implementation using `std::fs`.
///
/// Writes go to a temporary file in the target's directory which is then
/// renamed over the target, so a failed write never leaves a half-written
/// file behind.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> CrudgenResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> CrudgenResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp =
            NamedTempFile::new_in(dir).map_err(|e| map_io_error(path, e, "create temp file"))?;
        temp.write_all(content.as_bytes())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| map_io_error(path, e, "write file"))?;
        temp.persist(path)
            .map_err(|e| map_io_error(path, e.error, "replace file"))?;

        debug!(path = %path.display(), bytes = content.len(), "wrote file");
        Ok(())
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> CrudgenError {
    ApplicationError::FileIo {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/controller_test.go");
        let fs = LocalFilesystem::new();

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs.write_file(&path, "package b\n").unwrap();

        assert!(fs.exists(&path));
        assert_eq!(fs.read_to_string(&path).unwrap(), "package b\n");
    }

    #[test]
    fn write_replaces_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.go");
        std::fs::write(&path, "old contents that are longer").unwrap();

        LocalFilesystem.write_file(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        // No temp files left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_into_missing_directory_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing/x.go");
        let err = LocalFilesystem.write_file(&path, "x").unwrap_err();
        assert!(err.is_file_level());
        assert!(!path.exists());
    }

    #[test]
    fn read_missing_file_is_file_io() {
        let dir = TempDir::new().unwrap();
        let err = LocalFilesystem
            .read_to_string(&dir.path().join("nope.go"))
            .unwrap_err();
        assert!(matches!(
            err,
            CrudgenError::Application(ApplicationError::FileIo { .. })
        ));
    }
}
