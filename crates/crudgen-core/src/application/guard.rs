//! Existing-file guard: the generator's only write-conflict policy.

use std::path::Path;

use tracing::info;

use crate::application::ports::Filesystem;

/// Declines to write wherever a file already exists. No merge, diff,
/// backup or force.
pub struct ExistingFileGuard<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> ExistingFileGuard<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    pub fn should_write(&self, path: &Path) -> bool {
        if self.filesystem.exists(path) {
            info!(path = %path.display(), "SkippedExisting: file already exists");
            return false;
        }
        true
    }
}
