//! Application layer for crudgen.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerateService, PatchService)
//! - **Guard**: the existing-file write policy
//! - **Reports**: per-target batch outcomes
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod guard;
pub mod ports;
pub mod report;
pub mod services;

// Re-export main services
pub use services::{DEFAULT_PATCH_TARGETS, GenerateService, PatchService, default_targets};

pub use guard::ExistingFileGuard;
pub use report::{BatchReport, Outcome, Summary, TargetReport};

// Re-export port traits (for adapter implementation)
pub use ports::Filesystem;

pub use error::ApplicationError;
