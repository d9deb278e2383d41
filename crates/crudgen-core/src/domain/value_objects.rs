//! Domain value objects: ArtifactKind, RuleKind, CrudOp.
//!
//! # Design
//!
//! Plain `Copy` value types compared by value.
//! This file's only job is to define the types, their string
//! representations, and their `FromStr` parsers.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ArtifactKind ─────────────────────────────────────────────────────────────

/// The three test layers generated for every module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Repository,
    Service,
    Controller,
}

impl ArtifactKind {
    /// Generation order within a module.
    pub const ALL: [Self; 3] = [Self::Repository, Self::Service, Self::Controller];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::Service => "service",
            Self::Controller => "controller",
        }
    }

    /// File name inside the module directory.
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Repository => "repo_test.go",
            Self::Service => "service_test.go",
            Self::Controller => "controller_test.go",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "repository" | "repo" => Ok(Self::Repository),
            "service" | "svc" => Ok(Self::Service),
            "controller" | "ctl" => Ok(Self::Controller),
            other => Err(DomainError::InvalidModule {
                name: other.to_string(),
                reason: "unknown artifact kind (expected repository, service or controller)"
                    .into(),
            }),
        }
    }
}

// ── RuleKind ─────────────────────────────────────────────────────────────────

/// How a rewrite rule is applied by the patcher.
///
/// `LineDrop` and `FieldDeclarationRewrite` are line-scoped and run in the
/// same pass; the other two run over the whole file afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    FieldDeclarationRewrite,
    CallSiteRewrite,
    LineDrop,
    GlobalSubstitution,
}

impl RuleKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FieldDeclarationRewrite => "field-declaration-rewrite",
            Self::CallSiteRewrite => "call-site-rewrite",
            Self::LineDrop => "line-drop",
            Self::GlobalSubstitution => "global-substitution",
        }
    }

    pub const fn is_line_scoped(self) -> bool {
        matches!(self, Self::FieldDeclarationRewrite | Self::LineDrop)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "field-declaration-rewrite" | "field" => Ok(Self::FieldDeclarationRewrite),
            "call-site-rewrite" | "call-site" => Ok(Self::CallSiteRewrite),
            "line-drop" | "drop" => Ok(Self::LineDrop),
            "global-substitution" | "global" => Ok(Self::GlobalSubstitution),
            other => Err(DomainError::InvalidRule {
                rule: other.to_string(),
                reason: "unknown rule kind".into(),
            }),
        }
    }
}

// ── CrudOp ───────────────────────────────────────────────────────────────────

/// The five operations every module exposes at each layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOp {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl CrudOp {
    pub const ALL: [Self; 5] = [Self::List, Self::Get, Self::Create, Self::Update, Self::Delete];

    /// Method name on the repository contract (`Get` is `FindByID` there).
    pub const fn repository_method(self) -> &'static str {
        match self {
            Self::Get => "FindByID",
            other => other.service_method(),
        }
    }

    /// Method name on the service contract.
    pub const fn service_method(self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Get => "Get",
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}
