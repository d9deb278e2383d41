//! `crudgen list`: show the module registry.

use serde::Serialize;

use crudgen_core::{domain::ModuleConfig, error::CrudgenError};

use crate::{
    cli::{GlobalArgs, ListArgs, ListFormat, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct ModuleRow<'a> {
    name: &'a str,
    dto_prefix: &'a str,
    entity: &'a str,
    resource: String,
    requires: &'a [String],
    special: bool,
}

impl<'a> From<&'a ModuleConfig> for ModuleRow<'a> {
    fn from(m: &'a ModuleConfig) -> Self {
        Self {
            name: m.name(),
            dto_prefix: m.dto_prefix(),
            entity: m.entity(),
            resource: m.resource_path(),
            requires: m.requires(),
            special: m.is_special(),
        }
    }
}

pub fn execute(
    args: ListArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let manifest = super::load_manifest(args.manifest.as_deref(), &config)?;
    let registry = manifest
        .registry_or_builtin()
        .map_err(CrudgenError::from)?;

    let rows: Vec<ModuleRow<'_>> = registry
        .iter()
        .filter(|m| args.all || !m.is_special())
        .map(ModuleRow::from)
        .collect();

    let format = if output.format() == OutputFormat::Json {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Json => output.json(&rows)?,
        ListFormat::Names => {
            for row in &rows {
                output.raw(&format!("{}\n", row.name))?;
            }
        }
        ListFormat::Table => {
            output.header(&format!("{} module(s):", rows.len()))?;
            for line in table(&rows) {
                output.print(&line)?;
            }
        }
    }
    Ok(())
}

fn table(rows: &[ModuleRow<'_>]) -> Vec<String> {
    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let prefix_width = rows.iter().map(|r| r.dto_prefix.len()).max().unwrap_or(0);
    rows.iter()
        .map(|r| {
            let requires = if r.special {
                "(special)".to_string()
            } else if r.requires.is_empty() {
                "-".to_string()
            } else {
                r.requires.join(", ")
            };
            format!(
                "  {:<width$}  {:<prefix_width$}  /{}  requires: {}",
                r.name, r.dto_prefix, r.resource, requires
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudgen_core::domain::ModuleRegistry;

    #[test]
    fn table_aligns_columns() {
        let registry = ModuleRegistry::builtin();
        let rows: Vec<_> = registry.iter().map(ModuleRow::from).collect();
        let lines = table(&rows);
        assert_eq!(lines.len(), registry.len());

        let reviews = lines.iter().find(|l| l.trim_start().starts_with("reviews")).unwrap();
        assert!(reviews.contains("/reviews"));
        assert!(reviews.contains("requires: Product, User"));
        let uploads = lines.iter().find(|l| l.contains("uploads")).unwrap();
        assert!(uploads.contains("(special)"));
    }

    #[test]
    fn row_serializes_resource_path() {
        let config = ModuleConfig::builder("meal_plans")
            .dto_prefix("MealPlan")
            .build()
            .unwrap();
        let json = serde_json::to_value(ModuleRow::from(&config)).unwrap();
        assert_eq!(json["resource"], "meal-plans");
        assert_eq!(json["special"], false);
    }
}
