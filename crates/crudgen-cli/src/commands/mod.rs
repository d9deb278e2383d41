//! Command handlers. Each translates arguments into service calls and
//! renders the result; no business logic lives here.

use std::path::Path;

use crudgen_adapters::{Manifest, load_optional};
use crudgen_core::application::BatchReport;

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

pub mod completions;
pub mod config;
pub mod generate;
pub mod list;
pub mod patch;
pub mod show;

/// The `--manifest` flag, else `generator.manifest` from config, else none.
fn load_manifest(flag: Option<&Path>, config: &AppConfig) -> CliResult<Manifest> {
    let path = flag.or(config.generator.manifest.as_deref());
    Ok(load_optional(path)?)
}

/// Map a finished batch to the process result: any failed target is exit 1.
fn finish(report: &BatchReport) -> CliResult<()> {
    let failed = report.summary().failed;
    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: report.len(),
        });
    }
    Ok(())
}
