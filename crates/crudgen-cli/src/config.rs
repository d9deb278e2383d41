//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied at the call-site, not here)
//! 2. `CRUDGEN_` environment variables, `__` between sections
//!    (`CRUDGEN_GENERATOR__GO_MODULE=example.com/api`)
//! 3. Config file (`--config FILE`, else the platform config path)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crudgen_core::domain::{DEFAULT_GO_MODULE, EXPECTED_MESSAGE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub patch: PatchConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Where module directories live.
    pub modules_root: PathBuf,
    /// Go module path of the backend (`freshease/backend`).
    pub go_module: String,
    /// Root the built-in patch targets are resolved against.
    pub backend_root: PathBuf,
    /// Manifest used when `--manifest` is not given.
    #[serde(default)]
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchConfig {
    /// Rule set applied when `--rules` is not given.
    pub rules: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig {
                modules_root: PathBuf::from("backend/modules"),
                go_module: DEFAULT_GO_MODULE.into(),
                backend_root: PathBuf::from("backend"),
                manifest: None,
            },
            patch: PatchConfig {
                rules: EXPECTED_MESSAGE.into(),
            },
            output: OutputConfig {
                no_color: false,
                format: "auto".into(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// An explicit `config_file` must exist; the default path is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let file = match config_file {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::from(Self::config_path()).required(false),
        };

        Config::builder()
            .set_default(
                "generator.modules_root",
                path_value(&defaults.generator.modules_root),
            )?
            .set_default("generator.go_module", defaults.generator.go_module)?
            .set_default(
                "generator.backend_root",
                path_value(&defaults.generator.backend_root),
            )?
            .set_default("patch.rules", defaults.patch.rules)?
            .set_default("output.no_color", defaults.output.no_color)?
            .set_default("output.format", defaults.output.format)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("CRUDGEN")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.crudgen.toml` in
    /// the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "crudgen", "crudgen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".crudgen.toml"))
    }

    /// Look up a dotted key for `config get`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "generator.modules_root" => self.generator.modules_root.display().to_string(),
            "generator.go_module" => self.generator.go_module.clone(),
            "generator.backend_root" => self.generator.backend_root.display().to_string(),
            "generator.manifest" => self
                .generator
                .manifest
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "patch.rules" => self.patch.rules.clone(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            _ => return None,
        };
        Some(value)
    }
}

fn path_value(path: &Path) -> String {
    path.display().to_string()
}
