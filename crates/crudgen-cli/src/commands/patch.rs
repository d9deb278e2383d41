//! `crudgen patch`: apply a rewrite rule set to existing test files.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crudgen_adapters::{LocalFilesystem, TestFileScanner};
use crudgen_core::{
    application::{PatchService, default_targets},
    error::CrudgenError,
};

use crate::{
    cli::{GlobalArgs, PatchArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(scan = ?args.scan, dry_run = args.dry_run))]
pub fn execute(
    args: PatchArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let manifest = super::load_manifest(args.manifest.as_deref(), &config)?;
    let rule_set_name = args
        .rules
        .clone()
        .unwrap_or_else(|| config.patch.rules.clone());
    let rules = manifest
        .rule_set(&rule_set_name)
        .map_err(CrudgenError::from)?;

    let targets = resolve_targets(&args, &config)?;
    debug!(rules = rules.name(), targets = targets.len(), "Patch targets resolved");

    if targets.is_empty() {
        output.warning("No files to patch")?;
        return Ok(());
    }

    output.header(&format!(
        "Applying '{}' ({} rules) to {} file(s)",
        rules.name(),
        rules.len(),
        targets.len()
    ))?;

    if !args.dry_run && !args.yes && !global.quiet && !confirm(targets.len())? {
        return Err(CliError::Cancelled);
    }

    let service = PatchService::new(Box::new(LocalFilesystem::new())).dry_run(args.dry_run);

    let pb = output.progress(targets.len());
    let mut io_result = Ok(());
    let report = service.patch_all_with(&targets, &rules, |target| {
        pb.inc(1);
        if io_result.is_ok() {
            io_result = pb.suspend(|| output.target(target));
        }
    });
    pb.finish_and_clear();
    io_result?;

    info!(summary = ?report.summary(), "Patch finished");
    output.report(&report)?;
    super::finish(&report)
}

/// Explicit files, else a scan, else the built-in list under the backend
/// root. Missing files in the built-in list surface as per-file failures.
fn resolve_targets(args: &PatchArgs, config: &AppConfig) -> CliResult<Vec<PathBuf>> {
    if !args.files.is_empty() {
        return Ok(args.files.clone());
    }
    if let Some(root) = &args.scan {
        return scan(root);
    }
    let backend_root = args
        .backend_root
        .as_deref()
        .unwrap_or(&config.generator.backend_root);
    Ok(default_targets(backend_root))
}

fn scan(root: &Path) -> CliResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(CliError::PathNotFound {
            path: root.to_path_buf(),
        });
    }
    Ok(TestFileScanner::controllers().scan(root))
}

#[cfg(feature = "interactive")]
fn confirm(count: usize) -> CliResult<bool> {
    use std::io::IsTerminal;

    // Without a terminal there is nobody to ask.
    if !std::io::stdin().is_terminal() {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(format!("Rewrite {count} file(s) in place?"))
        .default(true)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: format!("confirmation prompt failed: {e}"),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm(_count: usize) -> CliResult<bool> {
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args() -> PatchArgs {
        PatchArgs {
            files: Vec::new(),
            scan: None,
            rules: None,
            manifest: None,
            backend_root: None,
            yes: true,
            dry_run: false,
        }
    }

    #[test]
    fn explicit_files_win() {
        let mut a = args();
        a.files = vec![PathBuf::from("x/controller_test.go")];
        let targets = resolve_targets(&a, &AppConfig::default()).unwrap();
        assert_eq!(targets, [PathBuf::from("x/controller_test.go")]);
    }

    #[test]
    fn default_list_is_under_backend_root() {
        let mut a = args();
        a.backend_root = Some(PathBuf::from("api"));
        let targets = resolve_targets(&a, &AppConfig::default()).unwrap();
        assert_eq!(targets.len(), 4);
        assert!(targets.iter().all(|t| t.starts_with("api/modules")));
    }

    #[test]
    fn scan_finds_controller_tests() {
        let dir = TempDir::new().unwrap();
        let module = dir.path().join("reviews");
        fs::create_dir_all(&module).unwrap();
        fs::write(module.join("controller_test.go"), "package reviews\n").unwrap();

        let mut a = args();
        a.scan = Some(dir.path().to_path_buf());
        let targets = resolve_targets(&a, &AppConfig::default()).unwrap();
        assert_eq!(targets, [module.join("controller_test.go")]);
    }

    #[test]
    fn scan_of_missing_dir_is_not_found() {
        let mut a = args();
        a.scan = Some(PathBuf::from("/definitely/not/here"));
        let err = resolve_targets(&a, &AppConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
