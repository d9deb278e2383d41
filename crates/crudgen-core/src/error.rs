//! Root error of `crudgen-core`.
//!
//! Every public operation returns [`CrudgenResult`]. The CLI maps
//! [`ErrorCategory`] to exit codes and prints [`CrudgenError::suggestions`].

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, ErrorCategory as DomainCategory};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CrudgenError {
    /// Invalid module declarations, rules or rule-set lookups.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// File I/O, manifest and lock failures.
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),
}

impl CrudgenError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                DomainCategory::Validation => ErrorCategory::Validation,
                DomainCategory::NotFound => ErrorCategory::NotFound,
                DomainCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// True for per-file I/O failures, which a batch records and moves past.
    pub fn is_file_level(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::FileIo { .. }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

pub type CrudgenResult<T> = Result<T, CrudgenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_category_is_mapped() {
        let err: CrudgenError = DomainError::UnknownRuleSet("x".into()).into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.is_file_level());
    }

    #[test]
    fn file_io_is_file_level() {
        let err: CrudgenError = ApplicationError::file_io("a.go", "denied").into();
        assert!(err.is_file_level());
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.to_string().contains("a.go"));
    }

    #[test]
    fn invalid_manifest_is_configuration() {
        let err: CrudgenError = ApplicationError::ManifestInvalid {
            path: "crudgen.toml".into(),
            reason: "bad".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
