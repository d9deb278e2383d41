//! CLI error type.
//!
//! Structured errors with user-facing messages, actionable suggestions and
//! an exit code per category.

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use crudgen_core::error::{CrudgenError, ErrorCategory as CoreCategory};

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input that clap could not catch.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A `--module` name the registry does not contain.
    #[error("Unknown module '{name}'")]
    UnknownModule {
        name: String,
        available: Vec<String>,
    },

    /// A module marked special has no generated tests.
    #[error("Module '{name}' is special and has no generated tests")]
    SpecialModule { name: String },

    /// One or more targets of a batch failed; the rest were processed.
    #[error("{failed} of {total} targets failed")]
    BatchFailed { failed: usize, total: usize },

    /// Scan root or explicit path does not exist.
    #[error("Path not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error propagated from `crudgen-core` or the adapters.
    #[error("{0}")]
    Core(#[from] CrudgenError),

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::UnknownModule { name, available } => {
                let mut suggestions = vec![format!("'{}' is not a configured module", name)];
                if !available.is_empty() {
                    suggestions.push(format!("Available modules: {}", available.join(", ")));
                }
                suggestions.push("List modules with: crudgen list".into());
                suggestions
            }

            Self::SpecialModule { name } => vec![
                format!("'{}' is handled by hand and skipped by the generator", name),
                "Use 'crudgen list --all' to see which modules are special".into(),
            ],

            Self::BatchFailed { .. } => vec![
                "The report above lists each failed file and its reason".into(),
                "Files that succeeded were written; re-running skips them".into(),
            ],

            Self::PathNotFound { path } => vec![
                format!("'{}' does not exist", path.display()),
                "Run crudgen from the repository root or pass --backend-root".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Inspect the resolved values with: crudgen config list".into(),
                "Locate the default file with: crudgen config path".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
            ],

            Self::Cancelled => vec!["No files were changed".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::SpecialModule { .. } | Self::Cancelled => {
                ErrorCategory::UserError
            }
            Self::UnknownModule { .. } | Self::PathNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::BatchFailed { .. } | Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    pub fn format_colored(&self, verbose: bool) -> String {
        self.render(verbose, true)
    }

    pub fn format_plain(&self, verbose: bool) -> String {
        self.render(verbose, false)
    }

    /// Headline, cause chain (verbose only), suggestions, then the `-v` hint
    /// when the chain was hidden.
    fn render(&self, verbose: bool, colored: bool) -> String {
        let paint = |text: &str, style: fn(&str) -> String| {
            if colored { style(text) } else { text.to_owned() }
        };

        let mut lines = vec![
            String::new(),
            format!(
                "{} {}",
                paint("\u{2717} Error:", |t| t.red().bold().to_string()),
                paint(&self.to_string(), |t| t.red().to_string()),
            ),
        ];

        if verbose {
            let causes = std::iter::successors(self.source(), |&e| e.source());
            for cause in causes {
                let text = paint(&cause.to_string(), |t| t.dimmed().to_string());
                lines.push(format!("  caused by: {text}"));
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            lines.push(String::new());
            lines.push(paint("Suggestions:", |t| t.yellow().bold().to_string()));
            lines.extend(suggestions.iter().map(|s| format!("  - {s}")));
        }

        if !verbose {
            lines.push(String::new());
            lines.push(paint("Re-run with -v for the full cause chain.", |t| {
                t.dimmed().to_string()
            }));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Mirror the error into the log at a level matching its category.
    pub fn log(&self) {
        let category = self.category();
        match category {
            ErrorCategory::UserError | ErrorCategory::NotFound => {
                tracing::warn!(?category, error = %self, "command failed")
            }
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                tracing::error!(?category, error = %self, "command failed")
            }
        }
        for cause in std::iter::successors(self.source(), |&e| e.source()) {
            tracing::debug!(%cause, "caused by");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserError,
    NotFound,
    Configuration,
    Internal,
}
