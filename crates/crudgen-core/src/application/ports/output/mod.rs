//! Driven (output) ports - implemented by infrastructure.
//!
//! The `crudgen-adapters` crate provides implementations.

use crate::error::CrudgenResult;
use std::path::Path;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `crudgen_adapters::filesystem::LocalFilesystem` (production)
/// - `crudgen_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> CrudgenResult<String>;

    /// Replace the content of `path` all-or-nothing: after a failure the
    /// previous content (or absence) is intact.
    fn write_file(&self, path: &Path, content: &str) -> CrudgenResult<()>;
}
