// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (batch reports keep a copy per target)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid module '{name}': {reason}")]
    InvalidModule { name: String, reason: String },

    #[error("Duplicate module in registry: {name}")]
    DuplicateModule { name: String },

    #[error("Invalid rewrite rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("Rewriting with '{rule}' is not idempotent: a second pass still changes '{output}'")]
    NonIdempotentRule { rule: String, output: String },

    #[error("Module '{name}' is special and has no templated surface")]
    SpecialModule { name: String },

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Unknown rule set: {0}")]
    UnknownRuleSet(String),

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidModule { name, reason } => vec![
                format!("Module '{}' is misconfigured: {}", name, reason),
                "Module names are snake_case, e.g. meal_plan_items".into(),
                "DTO prefixes are PascalCase, e.g. MealPlanItem".into(),
            ],
            Self::DuplicateModule { name } => vec![
                format!("'{}' is declared more than once", name),
                "Remove the duplicate entry from the manifest".into(),
            ],
            Self::UnknownModule(name) => vec![
                format!("No module named '{}' is registered", name),
                "Try: crudgen list".into(),
            ],
            Self::UnknownRuleSet(name) => vec![
                format!("No rule set named '{}'", name),
                "The built-in rule set is 'expected-message'".into(),
            ],
            Self::NonIdempotentRule { rule, .. } => vec![
                format!("Rule '{}' would rewrite its own output on a second run", rule),
                "Make sure no replacement produces text that a rule in the set matches".into(),
            ],
            Self::SpecialModule { name } => vec![
                format!("'{}' is marked special and is skipped by generation", name),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidModule { .. }
            | Self::DuplicateModule { .. }
            | Self::InvalidRule { .. }
            | Self::NonIdempotentRule { .. }
            | Self::SpecialModule { .. } => ErrorCategory::Validation,
            Self::UnknownModule(_) | Self::UnknownRuleSet(_) => ErrorCategory::NotFound,
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
