//! Generate Service - the one-shot generation path.
//!
//! Registry → fixture synthesizer → template instantiator → existing-file
//! guard → filesystem. Each module, and each file within it, is processed
//! fully before the next; a failure is recorded and the batch moves on.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        guard::ExistingFileGuard,
        ports::Filesystem,
        report::{BatchReport, Outcome, TargetReport},
    },
    domain::{
        ArtifactKind, ArtifactSet, DomainValidator as validator, FixtureSynthesizer,
        GeneratedArtifact, ModuleConfig, ModuleRegistry, RecipeBook, TemplateInstantiator,
    },
    error::CrudgenResult,
};

/// Main generation service.
pub struct GenerateService {
    filesystem: Box<dyn Filesystem>,
    instantiator: TemplateInstantiator,
    recipes: RecipeBook,
    modules_root: PathBuf,
    dry_run: bool,
}

impl GenerateService {
    /// Create a generation service writing under `modules_root`.
    pub fn new(filesystem: Box<dyn Filesystem>, modules_root: impl Into<PathBuf>) -> Self {
        Self {
            filesystem,
            instantiator: TemplateInstantiator::default(),
            recipes: RecipeBook::builtin(),
            modules_root: modules_root.into(),
            dry_run: false,
        }
    }

    pub fn with_instantiator(mut self, instantiator: TemplateInstantiator) -> Self {
        self.instantiator = instantiator;
        self
    }

    pub fn with_recipes(mut self, recipes: RecipeBook) -> Self {
        self.recipes = recipes;
        self
    }

    /// Report what would be created without touching the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn modules_root(&self) -> &Path {
        &self.modules_root
    }

    /// Generate every non-special module in the registry.
    pub fn generate_all(&self, registry: &ModuleRegistry) -> BatchReport {
        self.generate_all_with(registry, |_| {})
    }

    /// Like [`generate_all`](Self::generate_all), calling `on_target` after
    /// each file.
    #[instrument(skip_all, fields(modules = registry.len(), root = %self.modules_root.display()))]
    pub fn generate_all_with(
        &self,
        registry: &ModuleRegistry,
        mut on_target: impl FnMut(&TargetReport),
    ) -> BatchReport {
        info!("Generating tests for all modules");
        let mut report = BatchReport::new();
        for config in registry.generatable() {
            for target in self.generate_module(config) {
                on_target(&target);
                report.push(target);
            }
        }
        info!(summary = ?report.summary(), "Generation finished");
        report
    }

    /// Generate only the named modules. Unknown names are logged, recorded
    /// as failures and skipped.
    pub fn generate_named<S: AsRef<str>>(
        &self,
        registry: &ModuleRegistry,
        names: &[S],
        mut on_target: impl FnMut(&TargetReport),
    ) -> BatchReport {
        let mut report = BatchReport::new();
        for name in names.iter().map(AsRef::as_ref) {
            let targets = match registry.lookup(name) {
                Ok(config) if config.is_special() => {
                    info!(module = name, "Skipping special module");
                    continue;
                }
                Ok(config) => self.generate_module(config),
                Err(e) => {
                    warn!(module = name, error = %e, "UnknownModule: skipping");
                    vec![
                        TargetReport::new(self.modules_root.join(name), Outcome::Failed {
                            reason: e.to_string(),
                        })
                        .for_module(name),
                    ]
                }
            };
            for target in targets {
                on_target(&target);
                report.push(target);
            }
        }
        report
    }

    /// Render and persist the three artifacts of one module.
    ///
    /// The module directory must already exist: a module without its
    /// package sources is reported as [`Outcome::MissingModule`] and left
    /// alone.
    #[instrument(skip_all, fields(module = config.name()))]
    pub fn generate_module(&self, config: &ModuleConfig) -> Vec<TargetReport> {
        let dir = self.module_dir(config);
        if !self.filesystem.exists(&dir) {
            warn!(dir = %dir.display(), "Module directory not found, skipping");
            return vec![TargetReport::new(dir, Outcome::MissingModule).for_module(config.name())];
        }

        let artifacts = match self.artifacts(config) {
            Ok(artifacts) => artifacts,
            Err(e) => {
                warn!(error = %e, "Module could not be rendered");
                return vec![
                    TargetReport::new(self.module_dir(config), Outcome::Failed {
                        reason: e.to_string(),
                    })
                    .for_module(config.name()),
                ];
            }
        };

        let guard = ExistingFileGuard::new(self.filesystem.as_ref());
        artifacts
            .into_iter()
            .map(|artifact| {
                let outcome = if !guard.should_write(artifact.path()) {
                    Outcome::SkippedExisting
                } else if self.dry_run {
                    Outcome::Planned
                } else {
                    match self.persist(&artifact) {
                        Ok(()) => {
                            info!(path = %artifact.path().display(), "Created");
                            Outcome::Created
                        }
                        Err(e) => {
                            warn!(path = %artifact.path().display(), error = %e, "Write failed");
                            Outcome::Failed {
                                reason: e.to_string(),
                            }
                        }
                    }
                };
                TargetReport::new(artifact.path(), outcome).for_module(config.name())
            })
            .collect()
    }

    /// Render all artifacts of a module in memory.
    pub fn artifacts(&self, config: &ModuleConfig) -> CrudgenResult<ArtifactSet> {
        validator::validate_module(config)?;
        for label in validator::unresolved_labels(config, &self.recipes) {
            debug!(label, "No fixture recipe, placeholder will be emitted");
        }

        let plan = FixtureSynthesizer::new(&self.recipes).synthesize(config.requires());
        let dir = self.module_dir(config);

        let mut set = ArtifactSet::new(config.name());
        for kind in ArtifactKind::ALL {
            let body = self.instantiator.render(kind, config, &plan)?;
            set.push(GeneratedArtifact::new(dir.join(kind.file_name()), body, kind));
        }
        validator::validate_artifacts(&set)?;
        Ok(set)
    }

    /// Render one artifact without writing it.
    pub fn preview(&self, config: &ModuleConfig, kind: ArtifactKind) -> CrudgenResult<String> {
        let plan = FixtureSynthesizer::new(&self.recipes).synthesize(config.requires());
        Ok(self.instantiator.render(kind, config, &plan)?)
    }

    fn module_dir(&self, config: &ModuleConfig) -> PathBuf {
        self.modules_root.join(config.name())
    }

    fn persist(&self, artifact: &GeneratedArtifact) -> CrudgenResult<()> {
        self.filesystem.write_file(artifact.path(), artifact.body())
    }
}
