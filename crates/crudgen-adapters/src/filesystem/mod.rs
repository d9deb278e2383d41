//! Implementations of the core `Filesystem` port.
//!
//! [`LocalFilesystem`] backs the CLI and replaces files atomically.
//! [`MemoryFilesystem`] backs tests and can simulate per-path failures.

mod local;
mod memory;

pub use local::LocalFilesystem;
pub use memory::MemoryFilesystem;
