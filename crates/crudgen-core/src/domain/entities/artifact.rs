use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::{error::DomainError, value_objects::ArtifactKind};

/// Conflict policy applied when an artifact is persisted.
///
/// Regeneration is strictly additive, so there is only one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    #[default]
    SkipIfExists,
}

/// One rendered test file, computed in memory and persisted at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    path: PathBuf,
    body: String,
    kind: ArtifactKind,
    policy: WritePolicy,
}

impl GeneratedArtifact {
    pub fn new(path: impl Into<PathBuf>, body: String, kind: ArtifactKind) -> Self {
        Self {
            path: path.into(),
            body,
            kind,
            policy: WritePolicy::SkipIfExists,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn policy(&self) -> WritePolicy {
        self.policy
    }

    pub fn size(&self) -> usize {
        self.body.len()
    }
}

/// All artifacts for one module, in generation order.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    module: String,
    artifacts: Vec<GeneratedArtifact>,
}

impl ArtifactSet {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            artifacts: Vec::new(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn push(&mut self, artifact: GeneratedArtifact) {
        self.artifacts.push(artifact);
    }

    pub fn with(mut self, artifact: GeneratedArtifact) -> Self {
        self.push(artifact);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedArtifact> {
        self.artifacts.iter()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Reject empty sets and two artifacts targeting the same path.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.artifacts.is_empty() {
            return Err(DomainError::InvalidModule {
                name: self.module.clone(),
                reason: "no artifacts were rendered".into(),
            });
        }

        let mut seen = HashSet::new();
        for artifact in &self.artifacts {
            if !seen.insert(artifact.path()) {
                return Err(DomainError::InvalidModule {
                    name: self.module.clone(),
                    reason: format!("two artifacts target {}", artifact.path().display()),
                });
            }
        }

        Ok(())
    }
}

impl IntoIterator for ArtifactSet {
    type Item = GeneratedArtifact;
    type IntoIter = std::vec::IntoIter<GeneratedArtifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.into_iter()
    }
}
