//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! rules. Business rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Read or write failure on one target file.
    #[error("File I/O error at {path}: {reason}")]
    FileIo { path: PathBuf, reason: String },

    /// Manifest could not be read or parsed.
    #[error("Invalid manifest {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },

    /// Filesystem adapter state is unusable (lock poisoned, etc.).
    #[error("Filesystem adapter lock poisoned")]
    FilesystemLock,

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    pub fn file_io(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::FileIo {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FileIo { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that the file exists and you have read/write permissions".into(),
            ],
            Self::ManifestInvalid { path, .. } => vec![
                format!("Check the manifest at {}", path.display()),
                "Modules are declared as [[modules]] tables with a snake_case name".into(),
            ],
            Self::FilesystemLock => vec!["Retry the command".into()],
            Self::ValidationFailed(_) => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileIo { .. } | Self::FilesystemLock => ErrorCategory::Internal,
            Self::ManifestInvalid { .. } => ErrorCategory::Configuration,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
        }
    }
}
