//! `crudgen show`: render one artifact to stdout without writing it.

use crudgen_adapters::LocalFilesystem;
use crudgen_core::{
    application::GenerateService,
    domain::{ArtifactKind, TemplateInstantiator},
    error::CrudgenError,
};

use crate::{
    cli::{GlobalArgs, ShowArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: ShowArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let manifest = super::load_manifest(args.manifest.as_deref(), &config)?;
    let registry = manifest
        .registry_or_builtin()
        .map_err(CrudgenError::from)?;

    let module = registry
        .lookup(&args.module)
        .map_err(|_| CliError::UnknownModule {
            name: args.module.clone(),
            available: registry.names().iter().map(|n| n.to_string()).collect(),
        })?;
    if module.is_special() {
        return Err(CliError::SpecialModule {
            name: args.module.clone(),
        });
    }

    let go_module = args.go_module.unwrap_or(config.generator.go_module);
    let service = GenerateService::new(
        Box::new(LocalFilesystem::new()),
        config.generator.modules_root,
    )
    .with_instantiator(TemplateInstantiator::new(go_module));

    let body = service.preview(module, ArtifactKind::from(args.kind))?;
    output.raw(&body)?;
    Ok(())
}
