//! TOML manifest loader.
//!
//! A manifest can replace the built-in module registry and add rule sets:
//!
//! ```toml
//! [[modules]]
//! name = "recipes"
//! dto_prefix = "Recipe"
//! requires = ["Recipe"]
//! fields = ["name", "kcal"]
//!
//! [[rule_sets]]
//! name = "strip-debug"
//!
//! [[rule_sets.rules]]
//! name = "drop-println"
//! kind = "line-drop"
//! pattern = 'fmt\.Println'
//! witness = 'fmt.Println("x")'
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crudgen_core::{
    application::ApplicationError,
    domain::{DomainError, ModuleConfig, ModuleRegistry, RewriteRule, RuleKind, RuleSet},
    error::{CrudgenError, CrudgenResult},
};

// ── Serde model ──────────────────────────────────────────────────────────────

/// Deserialized manifest file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub modules: Vec<ModuleDef>,
    #[serde(default)]
    pub rule_sets: Vec<RuleSetDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDef {
    pub name: String,
    #[serde(default)]
    pub dto_prefix: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub special: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSetDef {
    pub name: String,
    pub rules: Vec<RuleDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDef {
    pub name: String,
    pub kind: RuleKind,
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
    pub witness: String,
}

// ── Conversion ───────────────────────────────────────────────────────────────

impl ModuleDef {
    fn to_config(&self) -> Result<ModuleConfig, DomainError> {
        let mut builder = ModuleConfig::builder(&self.name)
            .requires(&self.requires)
            .fields(&self.fields)
            .special(self.special);
        if let Some(prefix) = &self.dto_prefix {
            builder = builder.dto_prefix(prefix);
        }
        if let Some(entity) = &self.entity {
            builder = builder.entity(entity);
        }
        builder.build()
    }
}

impl RuleSetDef {
    fn to_rule_set(&self) -> Result<RuleSet, DomainError> {
        let rules = self
            .rules
            .iter()
            .map(|r| {
                RewriteRule::new(
                    &r.name,
                    r.kind,
                    &r.pattern,
                    r.replacement.as_str(),
                    r.witness.as_str(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        RuleSet::new(&self.name, rules)
    }
}

impl Manifest {
    /// Parse manifest text. Structural errors only; domain checks happen in
    /// [`Manifest::registry`] and [`Manifest::rule_set`].
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// The registry the manifest declares, or `None` when it declares no
    /// modules and the built-in registry applies.
    pub fn registry(&self) -> Result<Option<ModuleRegistry>, DomainError> {
        if self.modules.is_empty() {
            return Ok(None);
        }
        let configs = self
            .modules
            .iter()
            .map(ModuleDef::to_config)
            .collect::<Result<Vec<_>, _>>()?;
        ModuleRegistry::from_configs(configs).map(Some)
    }

    /// Registry to use: the manifest's own, else the built-in one.
    pub fn registry_or_builtin(&self) -> Result<ModuleRegistry, DomainError> {
        Ok(self.registry()?.unwrap_or_else(ModuleRegistry::builtin))
    }

    /// Resolve a rule set by name. Manifest rule sets shadow built-in ones.
    pub fn rule_set(&self, name: &str) -> Result<RuleSet, DomainError> {
        match self.rule_sets.iter().find(|r| r.name == name) {
            Some(def) => def.to_rule_set(),
            None => RuleSet::builtin(name),
        }
    }

    /// Names of every resolvable rule set, manifest first.
    pub fn rule_set_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rule_sets.iter().map(|r| r.name.as_str()).collect();
        for builtin in RuleSet::builtin_names() {
            if !names.contains(builtin) {
                names.push(*builtin);
            }
        }
        names
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

/// Reads manifests from disk.
#[derive(Debug, Clone)]
pub struct ManifestLoader {
    path: PathBuf,
}

impl ManifestLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and fully validate the manifest: every module and rule set it
    /// declares must construct.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> CrudgenResult<Manifest> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| self.invalid(format!("Failed to read manifest: {}", e)))?;

        let manifest =
            Manifest::from_toml_str(&content).map_err(|e| self.invalid(e.to_string()))?;

        manifest
            .registry()
            .map_err(|e| self.invalid(e.to_string()))?;
        for def in &manifest.rule_sets {
            debug!(rule_set = %def.name, rules = def.rules.len(), "validating rule set");
            def.to_rule_set()
                .map_err(|e| self.invalid(e.to_string()))?;
        }

        info!(
            modules = manifest.modules.len(),
            rule_sets = manifest.rule_sets.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    fn invalid(&self, reason: String) -> CrudgenError {
        ApplicationError::ManifestInvalid {
            path: self.path.clone(),
            reason,
        }
        .into()
    }
}

/// Load `path` when given, otherwise an empty manifest (built-ins only).
pub fn load_optional(path: Option<&Path>) -> CrudgenResult<Manifest> {
    match path {
        Some(path) => ManifestLoader::new(path).load(),
        None => Ok(Manifest::default()),
    }
}
