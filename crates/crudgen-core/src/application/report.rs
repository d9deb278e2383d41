//! Per-target outcomes of a generation or patch batch.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// What happened to one target file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Created,
    /// Dry run: the file would have been created.
    Planned,
    SkippedExisting,
    /// The module's directory does not exist; nothing was generated for it.
    MissingModule,
    Patched { rewrites: usize },
    Unchanged,
    Failed { reason: String },
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Planned => "planned",
            Self::SkippedExisting => "skipped",
            Self::MissingModule => "missing",
            Self::Patched { .. } => "patched",
            Self::Unchanged => "unchanged",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl TargetReport {
    pub fn new(path: impl Into<PathBuf>, outcome: Outcome) -> Self {
        Self {
            path: path.into(),
            module: None,
            outcome,
        }
    }

    pub fn for_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Counts per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub created: usize,
    pub planned: usize,
    pub skipped: usize,
    pub missing_modules: usize,
    pub patched: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub rewrites: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    targets: Vec<TargetReport>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: TargetReport) {
        self.targets.push(report);
    }

    pub fn extend(&mut self, reports: impl IntoIterator<Item = TargetReport>) {
        self.targets.extend(reports);
    }

    pub fn targets(&self) -> &[TargetReport] {
        &self.targets
    }

    pub fn failures(&self) -> impl Iterator<Item = &TargetReport> {
        self.targets.iter().filter(|t| t.outcome.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn summary(&self) -> Summary {
        self.targets
            .iter()
            .fold(Summary::default(), |mut s, t| {
                match &t.outcome {
                    Outcome::Created => s.created += 1,
                    Outcome::Planned => s.planned += 1,
                    Outcome::SkippedExisting => s.skipped += 1,
                    Outcome::MissingModule => s.missing_modules += 1,
                    Outcome::Patched { rewrites } => {
                        s.patched += 1;
                        s.rewrites += rewrites;
                    }
                    Outcome::Unchanged => s.unchanged += 1,
                    Outcome::Failed { .. } => s.failed += 1,
                }
                s
            })
    }
}

impl FromIterator<TargetReport> for BatchReport {
    fn from_iter<I: IntoIterator<Item = TargetReport>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_outcomes() {
        let report: BatchReport = [
            TargetReport::new("a", Outcome::Created),
            TargetReport::new("b", Outcome::SkippedExisting),
            TargetReport::new("c", Outcome::Patched { rewrites: 3 }),
            TargetReport::new("d", Outcome::Patched { rewrites: 1 }),
            TargetReport::new("e", Outcome::Failed { reason: "x".into() }),
            TargetReport::new("f", Outcome::MissingModule),
        ]
        .into_iter()
        .collect();

        let s = report.summary();
        assert_eq!((s.created, s.skipped, s.patched, s.failed), (1, 1, 2, 1));
        assert_eq!(s.rewrites, 4);
        assert_eq!(s.missing_modules, 1);
        assert!(report.has_failures());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn serializes_with_status_tag() {
        let report = TargetReport::new("recipes/repo_test.go", Outcome::Patched { rewrites: 2 })
            .for_module("recipes");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "patched");
        assert_eq!(json["rewrites"], 2);
        assert_eq!(json["module"], "recipes");
        assert_eq!(json["path"], "recipes/repo_test.go");
    }
}
