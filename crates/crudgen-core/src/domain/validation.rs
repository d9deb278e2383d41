use std::collections::HashSet;

use crate::domain::{
    entities::{artifact::ArtifactSet, module::ModuleConfig},
    error::DomainError,
    fixtures::RecipeBook,
    registry::ModuleRegistry,
    rewrite::RuleSet,
};

/// Centralized domain validation.
///
/// Cross-entity checks live here; single-entity invariants are enforced by
/// the constructors themselves.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_artifacts(artifacts: &ArtifactSet) -> Result<(), DomainError> {
        artifacts.validate()
    }

    /// A generatable module must carry a DTO prefix and list each
    /// requirement once.
    pub fn validate_module(config: &ModuleConfig) -> Result<(), DomainError> {
        if config.is_special() {
            return Ok(());
        }
        if config.dto_prefix().is_empty() {
            return Err(DomainError::InvalidModule {
                name: config.name().to_string(),
                reason: "generatable modules need a DTO prefix".into(),
            });
        }
        let mut seen = HashSet::new();
        if let Some(dup) = config.requires().iter().find(|r| !seen.insert(r.as_str())) {
            return Err(DomainError::InvalidModule {
                name: config.name().to_string(),
                reason: format!("'{dup}' is required twice"),
            });
        }
        Ok(())
    }

    pub fn validate_registry(registry: &ModuleRegistry) -> Result<(), DomainError> {
        registry.iter().try_for_each(Self::validate_module)
    }

    /// Labels a module requires that no recipe can build. Not an error:
    /// they become placeholders.
    pub fn unresolved_labels<'a>(config: &'a ModuleConfig, book: &RecipeBook) -> Vec<&'a str> {
        config
            .requires()
            .iter()
            .map(String::as_str)
            .filter(|label| !book.contains(label))
            .collect()
    }

    pub fn validate_rule_set(rules: &RuleSet) -> Result<(), DomainError> {
        if rules.is_empty() {
            return Err(DomainError::InvalidRule {
                rule: rules.name().to_string(),
                reason: "rule set has no rules".into(),
            });
        }
        Ok(())
    }
}
