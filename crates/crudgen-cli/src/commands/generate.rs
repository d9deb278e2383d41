//! `crudgen generate`: write missing test files for registry modules.

use std::collections::HashSet;

use tracing::{debug, info, instrument};

use crudgen_adapters::LocalFilesystem;
use crudgen_core::{
    application::GenerateService,
    domain::{ModuleRegistry, TemplateInstantiator},
};

use crate::{
    cli::{GenerateArgs, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(modules = args.modules.len(), dry_run = args.dry_run))]
pub fn execute(
    args: GenerateArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let manifest = super::load_manifest(args.manifest.as_deref(), &config)?;
    let registry = manifest
        .registry_or_builtin()
        .map_err(crudgen_core::error::CrudgenError::from)?;

    let names = select_modules(&registry, &args.modules)?;
    let modules_root = args.modules_root.unwrap_or(config.generator.modules_root);
    let go_module = args.go_module.unwrap_or(config.generator.go_module);
    debug!(root = %modules_root.display(), go_module = %go_module, "Generation target resolved");

    let service = GenerateService::new(Box::new(LocalFilesystem::new()), &modules_root)
        .with_instantiator(TemplateInstantiator::new(go_module))
        .dry_run(args.dry_run);

    output.header(&format!(
        "{} tests for {} module(s) under {}",
        if args.dry_run { "Planning" } else { "Generating" },
        names.len(),
        modules_root.display()
    ))?;

    let pb = output.progress(names.len() * 3);
    let mut io_result = Ok(());
    let report = service.generate_named(&registry, &names, |target| {
        pb.inc(1);
        if io_result.is_ok() {
            io_result = pb.suspend(|| output.target(target));
        }
    });
    pb.finish_and_clear();
    io_result?;

    info!(summary = ?report.summary(), "Generate finished");
    output.report(&report)?;
    super::finish(&report)
}

/// Names to generate: all generatable modules, or the requested ones in the
/// order given. Unknown and special names are rejected before anything is
/// written.
fn select_modules(registry: &ModuleRegistry, requested: &[String]) -> CliResult<Vec<String>> {
    if requested.is_empty() {
        return Ok(registry
            .generatable()
            .map(|m| m.name().to_string())
            .collect());
    }

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for name in requested {
        let module = registry.lookup(name).map_err(|_| CliError::UnknownModule {
            name: name.clone(),
            available: registry.names().iter().map(|n| n.to_string()).collect(),
        })?;
        if module.is_special() {
            return Err(CliError::SpecialModule { name: name.clone() });
        }
        if seen.insert(name.as_str()) {
            names.push(name.clone());
        }
    }
    Ok(names)
}
