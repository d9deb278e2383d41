//! CLI argument definitions using the clap derive API.
//!
//! Argument names, help text and value enums live here. No business logic.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crudgen_core::domain::ArtifactKind;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "crudgen",
    bin_name = "crudgen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Test scaffolding and convention patching for CRUD backend modules",
    long_about = "crudgen writes repository, service and controller test files for \
                  each CRUD module of a Go backend, and migrates existing controller \
                  tests to the current assertion conventions.",
    after_help = "EXAMPLES:\n\
        \x20 crudgen generate\n\
        \x20 crudgen generate --module reviews --module payments --dry-run\n\
        \x20 crudgen patch --scan backend/modules\n\
        \x20 crudgen show recipes --kind service",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write missing test files for configured modules.
    #[command(
        visible_alias = "gen",
        about = "Generate test files for modules",
        after_help = "EXAMPLES:\n\
            \x20 crudgen generate\n\
            \x20 crudgen generate --modules-root backend/modules --module reviews\n\
            \x20 crudgen generate --manifest crudgen.toml --dry-run"
    )]
    Generate(GenerateArgs),

    /// Apply a rewrite rule set to existing test files.
    #[command(
        about = "Patch existing controller tests",
        after_help = "EXAMPLES:\n\
            \x20 crudgen patch --yes\n\
            \x20 crudgen patch backend/modules/payments/controller_test.go\n\
            \x20 crudgen patch --scan backend/modules --rules expected-message"
    )]
    Patch(PatchArgs),

    /// List registry modules.
    #[command(
        visible_alias = "ls",
        about = "List configured modules",
        after_help = "EXAMPLES:\n\
            \x20 crudgen list\n\
            \x20 crudgen list --format json"
    )]
    List(ListArgs),

    /// Print one rendered artifact without writing it.
    #[command(
        about = "Render one test file to stdout",
        after_help = "EXAMPLES:\n\
            \x20 crudgen show reviews --kind repository\n\
            \x20 crudgen show meal_plans --kind controller"
    )]
    Show(ShowArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 crudgen completions bash > ~/.local/share/bash-completion/completions/crudgen\n\
            \x20 crudgen completions zsh  > ~/.zfunc/_crudgen"
    )]
    Completions(CompletionsArgs),

    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 crudgen config get generator.go_module\n\
            \x20 crudgen config list\n\
            \x20 crudgen config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Directory holding one sub-directory per module.
    #[arg(long = "modules-root", value_name = "DIR")]
    pub modules_root: Option<PathBuf>,

    /// Only generate these modules (repeatable).
    #[arg(short = 'm', long = "module", value_name = "NAME")]
    pub modules: Vec<String>,

    /// Report what would be written without writing.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// TOML manifest replacing the built-in module registry.
    #[arg(long = "manifest", value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Go module path used for local imports in generated files.
    #[arg(long = "go-module", value_name = "PATH")]
    pub go_module: Option<String>,
}

// ── patch ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PatchArgs {
    /// Files to patch. Defaults to the built-in target list under the
    /// backend root.
    #[arg(value_name = "FILES", conflicts_with = "scan")]
    pub files: Vec<PathBuf>,

    /// Patch every controller_test.go under this directory.
    #[arg(long = "scan", value_name = "DIR")]
    pub scan: Option<PathBuf>,

    /// Rule set to apply.
    #[arg(long = "rules", value_name = "NAME")]
    pub rules: Option<String>,

    /// TOML manifest declaring extra rule sets.
    #[arg(long = "manifest", value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Root the built-in target list is resolved against.
    #[arg(long = "backend-root", value_name = "DIR")]
    pub backend_root: Option<PathBuf>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Count rewrites without writing.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ListFormat,

    /// Include special modules that are never generated.
    #[arg(long = "all")]
    pub all: bool,

    #[arg(long = "manifest", value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Aligned table.
    Table,
    /// One name per line.
    Names,
    /// JSON array.
    Json,
}

// ── show ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Module name, e.g. `reviews`.
    #[arg(value_name = "MODULE")]
    pub module: String,

    #[arg(short = 'k', long = "kind", value_enum, default_value = "controller")]
    pub kind: KindArg,

    #[arg(long = "manifest", value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    #[arg(long = "go-module", value_name = "PATH")]
    pub go_module: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    #[value(alias = "repo")]
    Repository,
    Service,
    Controller,
}

impl From<KindArg> for ArtifactKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Repository => Self::Repository,
            KindArg::Service => Self::Service,
            KindArg::Controller => Self::Controller,
        }
    }
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `generator.go_module`.
        key: String,
    },
    /// Print the resolved configuration.
    List,
    /// Print the path of the default configuration file.
    Path,
}
