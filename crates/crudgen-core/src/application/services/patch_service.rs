//! Patch Service - the maintenance path.
//!
//! Applies a [`RuleSet`] to files already on disk. Independent of the
//! registry and the instantiator: it only sees paths and text.

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ports::Filesystem,
        report::{BatchReport, Outcome, TargetReport},
    },
    domain::{DomainValidator as validator, RuleSet},
    error::CrudgenResult,
};

/// Controller test files patched when no explicit list is given, relative to
/// the backend root.
pub const DEFAULT_PATCH_TARGETS: &[&str] = &[
    "modules/deliveries/controller_test.go",
    "modules/payments/controller_test.go",
    "modules/recipes/controller_test.go",
    "modules/reviews/controller_test.go",
];

pub fn default_targets(backend_root: &Path) -> Vec<PathBuf> {
    DEFAULT_PATCH_TARGETS
        .iter()
        .map(|p| backend_root.join(p))
        .collect()
}

pub struct PatchService {
    filesystem: Box<dyn Filesystem>,
    dry_run: bool,
}

impl PatchService {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            dry_run: false,
        }
    }

    /// Compute rewrites but never write back.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Patch one file. Returns the number of applied rewrites; the file is
    /// written back only when its content changed and a second pass over the
    /// result would change nothing.
    #[instrument(skip_all, fields(path = %path.display(), rules = rules.name()))]
    pub fn patch(&self, path: &Path, rules: &RuleSet) -> CrudgenResult<usize> {
        validator::validate_rule_set(rules)?;

        let original = self.filesystem.read_to_string(path)?;
        let outcome = rules.apply_checked(&original)?;

        if outcome.changed(&original) && !self.dry_run {
            self.filesystem.write_file(path, &outcome.content)?;
            info!(rewrites = outcome.applied, "Patched");
        }
        Ok(outcome.applied)
    }

    pub fn patch_all(&self, paths: &[PathBuf], rules: &RuleSet) -> BatchReport {
        self.patch_all_with(paths, rules, |_| {})
    }

    /// Patch every path in order. One file's failure is recorded and does
    /// not stop the rest.
    pub fn patch_all_with(
        &self,
        paths: &[PathBuf],
        rules: &RuleSet,
        mut on_target: impl FnMut(&TargetReport),
    ) -> BatchReport {
        let mut report = BatchReport::new();
        for path in paths {
            let outcome = match self.patch(path, rules) {
                Ok(0) => Outcome::Unchanged,
                Ok(rewrites) => Outcome::Patched { rewrites },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Patch failed, continuing");
                    Outcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            let target = TargetReport::new(path, outcome);
            on_target(&target);
            report.push(target);
        }
        info!(summary = ?report.summary(), "Patch batch finished");
        report
    }
}
