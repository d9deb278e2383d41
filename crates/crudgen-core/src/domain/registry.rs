//! Module registry: immutable table of generatable modules.
//!
//! Built once (from the built-in table or a manifest) and passed explicitly to
//! every service that needs it.

use std::collections::HashMap;

use crate::domain::{entities::module::ModuleConfig, error::DomainError};

#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<ModuleConfig>,
    index: HashMap<String, usize>,
}

impl ModuleRegistry {
    /// Build a registry, rejecting duplicate module names.
    pub fn from_configs(
        configs: impl IntoIterator<Item = ModuleConfig>,
    ) -> Result<Self, DomainError> {
        let mut registry = Self::default();
        for config in configs {
            if registry.index.contains_key(config.name()) {
                return Err(DomainError::DuplicateModule {
                    name: config.name().to_string(),
                });
            }
            registry
                .index
                .insert(config.name().to_string(), registry.modules.len());
            registry.modules.push(config);
        }
        Ok(registry)
    }

    /// The modules the generator ships with.
    pub fn builtin() -> Self {
        let modules = builtin_modules();
        let index = modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name().to_string(), i))
            .collect();
        Self { modules, index }
    }

    pub fn lookup(&self, name: &str) -> Result<&ModuleConfig, DomainError> {
        self.index
            .get(name)
            .map(|&i| &self.modules[i])
            .ok_or_else(|| DomainError::UnknownModule(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All modules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleConfig> {
        self.modules.iter()
    }

    /// Modules that take part in templated generation.
    pub fn generatable(&self) -> impl Iterator<Item = &ModuleConfig> {
        self.modules.iter().filter(|m| !m.is_special())
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(ModuleConfig::name).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

// ── Built-in table ───────────────────────────────────────────────────────────

struct Row {
    name: &'static str,
    prefix: &'static str,
    requires: &'static [&'static str],
    fields: &'static [&'static str],
    special: bool,
}

const fn row(
    name: &'static str,
    prefix: &'static str,
    requires: &'static [&'static str],
    fields: &'static [&'static str],
) -> Row {
    Row {
        name,
        prefix,
        requires,
        fields,
        special: false,
    }
}

const BUILTIN: &[Row] = &[
    row("deliveries", "Delivery", &["Order"], &[]),
    row("payments", "Payment", &["Order"], &[]),
    row("recipes", "Recipe", &[], &["name", "instructions", "kcal"]),
    row(
        "reviews",
        "Review",
        &["Product", "User"],
        &["rating", "comment", "user_id", "product_id"],
    ),
    row(
        "notifications",
        "Notification",
        &["User"],
        &["title", "message", "type", "user_id"],
    ),
    row(
        "meal_plans",
        "MealPlan",
        &["User"],
        &["name", "start_date", "end_date", "user_id"],
    ),
    row(
        "meal_plan_items",
        "MealPlanItem",
        &["MealPlan", "Recipe"],
        &["meal_plan_id", "recipe_id", "day", "meal_type"],
    ),
    row(
        "order_items",
        "OrderItem",
        &["Order", "Product"],
        &["order_id", "product_id", "quantity", "price"],
    ),
    row(
        "recipe_items",
        "RecipeItem",
        &["Recipe", "Product"],
        &["recipe_id", "product_id", "quantity", "unit"],
    ),
    row(
        "bundle_items",
        "BundleItem",
        &["Bundle", "Product"],
        &["bundle_id", "product_id", "quantity"],
    ),
    Row {
        name: "uploads",
        prefix: "",
        requires: &[],
        fields: &[],
        special: true,
    },
];

fn builtin_modules() -> Vec<ModuleConfig> {
    BUILTIN
        .iter()
        .filter_map(|r| {
            ModuleConfig::builder(r.name)
                .dto_prefix(r.prefix)
                .requires(r.requires.iter().copied())
                .fields(r.fields.iter().copied())
                .special(r.special)
                .build()
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_complete() {
        let registry = ModuleRegistry::builtin();
        assert_eq!(registry.len(), BUILTIN.len());
        assert_eq!(registry.generatable().count(), BUILTIN.len() - 1);
    }

    #[test]
    fn lookup_hit_and_miss() {
        let registry = ModuleRegistry::builtin();
        let reviews = registry.lookup("reviews").unwrap();
        assert_eq!(reviews.dto_prefix(), "Review");
        assert_eq!(reviews.requires(), ["Product", "User"]);

        assert_eq!(
            registry.lookup("nope").unwrap_err(),
            DomainError::UnknownModule("nope".into())
        );
    }

    #[test]
    fn uploads_is_special() {
        let registry = ModuleRegistry::builtin();
        assert!(registry.lookup("uploads").unwrap().is_special());
        assert!(registry.generatable().all(|m| m.name() != "uploads"));
    }

    #[test]
    fn preserves_declaration_order() {
        let registry = ModuleRegistry::builtin();
        assert_eq!(registry.names()[..3], ["deliveries", "payments", "recipes"]);
    }

    #[test]
    fn rejects_duplicates() {
        let a = ModuleConfig::builder("recipes").build().unwrap();
        let err = ModuleRegistry::from_configs([a.clone(), a]).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateModule { .. }));
    }
}
