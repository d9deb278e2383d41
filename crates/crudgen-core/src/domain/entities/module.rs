//! Module configuration: the unit of generation.
//!
//! A [`ModuleConfig`] describes one CRUD-style backend module (entity,
//! repository, service, controller). Every name that appears in generated
//! test code is derived from it, so two artifacts rendered from the same
//! config always agree on DTO types, routes and handler names.

use std::fmt;

use crate::domain::{
    casing::{to_kebab_case, to_pascal_case},
    error::DomainError,
};

/// One generatable backend module.
///
/// Construct through [`ModuleConfig::builder`]; `build()` fills in derived
/// defaults and validates naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConfig {
    name: String,
    dto_prefix: String,
    entity: String,
    requires: Vec<String>,
    fields: Vec<String>,
    special: bool,
}

impl ModuleConfig {
    pub fn builder(name: impl Into<String>) -> ModuleConfigBuilder {
        ModuleConfigBuilder {
            name: name.into(),
            ..ModuleConfigBuilder::default()
        }
    }

    /// Unique identifier, Go package name and output directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dto_prefix(&self) -> &str {
        &self.dto_prefix
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Related-entity labels in declaration order.
    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_special(&self) -> bool {
        self.special
    }

    /// DTO type names for this module.
    pub fn dto_names(&self) -> DtoNames {
        DtoNames::new(&self.dto_prefix)
    }

    /// HTTP resource path segment: underscores become hyphens and the name is
    /// pluralized by appending `s` unless it already ends in `s`.
    pub fn resource_path(&self) -> String {
        let resource = to_kebab_case(&self.name);
        if resource.ends_with('s') {
            resource
        } else {
            format!("{resource}s")
        }
    }

    /// PascalCase plural resource name (`order-items` → `OrderItems`).
    pub fn resource_title(&self) -> String {
        to_pascal_case(&self.resource_path())
    }

    /// Registered list handler on the controller (`ListOrderItems`).
    pub fn list_handler(&self) -> String {
        format!("List{}", self.resource_title())
    }
}

impl fmt::Display for ModuleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.dto_prefix)
    }
}

/// The three DTO type names implied by a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtoNames {
    pub get: String,
    pub create: String,
    pub update: String,
}

impl DtoNames {
    pub fn new(prefix: &str) -> Self {
        Self {
            get: format!("Get{prefix}DTO"),
            create: format!("Create{prefix}DTO"),
            update: format!("Update{prefix}DTO"),
        }
    }
}

/// Builder for [`ModuleConfig`].
///
/// `dto_prefix` defaults to the PascalCase module name (`meal_plans` →
/// `MealPlans`) and `entity` defaults to the prefix.
#[derive(Debug, Default)]
pub struct ModuleConfigBuilder {
    name: String,
    dto_prefix: Option<String>,
    entity: Option<String>,
    requires: Vec<String>,
    fields: Vec<String>,
    special: bool,
}

impl ModuleConfigBuilder {
    pub fn dto_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dto_prefix = Some(prefix.into());
        self
    }

    pub fn entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn requires<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn special(mut self, special: bool) -> Self {
        self.special = special;
        self
    }

    pub fn build(self) -> Result<ModuleConfig, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidModule {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" });
        }
        if !is_snake_identifier(&self.name) {
            return Err(invalid("name must be lower snake_case"));
        }

        let dto_prefix = self
            .dto_prefix
            .clone()
            .unwrap_or_else(|| to_pascal_case(&self.name));

        // Special modules have no DTO surface; an empty prefix is allowed.
        if !(self.special && dto_prefix.is_empty()) && !is_exported_identifier(&dto_prefix) {
            return Err(invalid("dto prefix must be a PascalCase Go identifier"));
        }
        if self.requires.iter().any(|label| label.trim().is_empty()) {
            return Err(invalid("required entity labels cannot be empty"));
        }

        let entity = self.entity.clone().unwrap_or_else(|| dto_prefix.clone());

        Ok(ModuleConfig {
            name: self.name,
            dto_prefix,
            entity,
            requires: self.requires,
            fields: self.fields,
            special: self.special,
        })
    }
}

fn is_snake_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_exported_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str) -> ModuleConfig {
        ModuleConfig::builder(name).build().unwrap()
    }

    #[test]
    fn dto_prefix_derived_from_name() {
        let m = module("meal_plans");
        assert_eq!(m.dto_prefix(), "MealPlans");
        assert_eq!(m.entity(), "MealPlans");
    }

    #[test]
    fn explicit_prefix_and_entity_default() {
        let m = ModuleConfig::builder("recipes")
            .dto_prefix("Recipe")
            .build()
            .unwrap();
        assert_eq!(m.entity(), "Recipe");
        assert_eq!(m.dto_names().get, "GetRecipeDTO");
        assert_eq!(m.dto_names().create, "CreateRecipeDTO");
        assert_eq!(m.dto_names().update, "UpdateRecipeDTO");
    }

    #[test]
    fn resource_path_hyphenates_and_keeps_plural() {
        let m = module("order_items");
        assert_eq!(m.resource_path(), "order-items");
        assert_eq!(m.list_handler(), "ListOrderItems");
    }

    #[test]
    fn resource_path_no_double_plural() {
        let m = module("recipes");
        assert_eq!(m.resource_path(), "recipes");
        assert_eq!(m.list_handler(), "ListRecipes");
    }

    #[test]
    fn resource_path_pluralizes_singular_names() {
        let m = module("inventory");
        assert_eq!(m.resource_path(), "inventorys");
        assert_eq!(m.resource_title(), "Inventorys");
    }

    #[test]
    fn rejects_non_snake_names() {
        assert!(ModuleConfig::builder("MealPlans").build().is_err());
        assert!(ModuleConfig::builder("meal-plans").build().is_err());
        assert!(matches!(
            ModuleConfig::builder("").build(),
            Err(DomainError::MissingRequiredField { field: "name" })
        ));
    }

    #[test]
    fn rejects_lowercase_prefix() {
        let err = ModuleConfig::builder("recipes")
            .dto_prefix("recipe")
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidModule { .. }));
    }

    #[test]
    fn special_module_may_have_empty_prefix() {
        let m = ModuleConfig::builder("uploads")
            .dto_prefix("")
            .special(true)
            .build()
            .unwrap();
        assert!(m.is_special());
        assert_eq!(m.dto_prefix(), "");
    }

    #[test]
    fn non_special_module_rejects_empty_prefix() {
        assert!(ModuleConfig::builder("uploads").dto_prefix("").build().is_err());
    }
}
