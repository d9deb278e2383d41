//! Infrastructure adapters for crudgen.
//!
//! This crate implements the ports defined in `crudgen-core::application::ports`
//! and owns everything that touches the disk: the filesystem adapters, the
//! TOML manifest loader and the test-file scanner used by `patch --scan`.

pub mod discovery;
pub mod filesystem;
pub mod manifest;

// Re-export commonly used adapters
pub use discovery::TestFileScanner;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use manifest::{Manifest, ManifestLoader, load_optional};
