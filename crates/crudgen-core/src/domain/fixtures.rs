//! Fixture recipes and the synthesizer that orders them.
//!
//! A recipe is data: how to construct one prerequisite entity with the ent
//! client, and which other entities must exist first. The synthesizer expands
//! a module's `requires` list depth-first into a flat plan in which every
//! step's prerequisites appear strictly earlier, each label at most once.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::domain::{casing::to_lower_camel, error::DomainError};

/// One builder call in a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// `.SetName("Test User")`: value is a Go expression.
    Literal { setter: String, value: String },
    /// `.SetVendor(vendor)`: argument is the binding of another fixture.
    Edge { setter: String, label: String },
}

impl Assignment {
    pub fn literal(setter: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Literal {
            setter: setter.into(),
            value: value.into(),
        }
    }

    pub fn edge(setter: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Edge {
            setter: setter.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureRecipe {
    label: String,
    binding: String,
    assignments: Vec<Assignment>,
    requires: Vec<String>,
}

impl FixtureRecipe {
    /// New recipe for `label`; the Go binding defaults to its lowerCamel form.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            binding: to_lower_camel(&label),
            label,
            assignments: Vec::new(),
            requires: Vec::new(),
        }
    }

    pub fn binding(mut self, binding: impl Into<String>) -> Self {
        self.binding = binding.into();
        self
    }

    pub fn set(mut self, setter: &str, value: &str) -> Self {
        self.assignments.push(Assignment::literal(setter, value));
        self
    }

    /// Add an edge to `label`, which also becomes a prerequisite.
    pub fn edge(mut self, setter: &str, label: &str) -> Self {
        self.assignments.push(Assignment::edge(setter, label));
        if !self.requires.iter().any(|r| r == label) {
            self.requires.push(label.to_string());
        }
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn binding_name(&self) -> &str {
        &self.binding
    }

    /// ent client accessor (`client.MealPlan`).
    pub fn accessor(&self) -> &str {
        &self.label
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn requires(&self) -> &[String] {
        &self.requires
    }
}

/// Recipes keyed by entity label.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: HashMap<String, FixtureRecipe>,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, recipe: FixtureRecipe) -> Result<(), DomainError> {
        if recipe.binding.is_empty() {
            return Err(DomainError::InvalidModule {
                name: recipe.label.clone(),
                reason: "fixture recipe has an empty binding".into(),
            });
        }
        self.recipes.insert(recipe.label.clone(), recipe);
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<&FixtureRecipe> {
        self.recipes.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.recipes.contains_key(label)
    }

    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<_> = self.recipes.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    pub fn builtin() -> Self {
        let recipes = [
            FixtureRecipe::new("User")
                .set("SetEmail", r#""test@example.com""#)
                .set("SetName", r#""Test User""#)
                .set("SetPassword", r#""password""#),
            FixtureRecipe::new("Vendor")
                .set("SetName", r#""Test Vendor""#)
                .set("SetContact", r#""vendor@example.com""#),
            FixtureRecipe::new("Product")
                .set("SetName", r#""Test Product""#)
                .set("SetSku", r#""TEST-001""#)
                .set("SetPrice", "99.99")
                .set("SetIsActive", "true")
                .edge("SetVendor", "Vendor"),
            FixtureRecipe::new("Order")
                .set("SetOrderNo", r#""ORD-001""#)
                .set("SetStatus", r#""pending""#)
                .set("SetSubtotal", "100.0")
                .set("SetShippingFee", "10.0")
                .set("SetDiscount", "0.0")
                .set("SetTotal", "110.0")
                .edge("AddUser", "User"),
            FixtureRecipe::new("Bundle")
                .set("SetName", r#""Test Bundle""#)
                .set("SetPrice", "99.99")
                .set("SetIsActive", "true"),
            FixtureRecipe::new("MealPlan")
                .set("SetName", r#""Test Meal Plan""#)
                .edge("AddUser", "User"),
            FixtureRecipe::new("Recipe")
                .set("SetName", r#""Test Recipe""#)
                .set("SetKcal", "500"),
            FixtureRecipe::new("Category")
                .set("SetName", r#""Test Category""#)
                .set("SetSlug", r#""test-category""#),
            FixtureRecipe::new("Cart")
                .set("SetStatus", r#""active""#)
                .edge("SetUser", "User"),
        ];

        let recipes = recipes
            .into_iter()
            .map(|r| (r.label.clone(), r))
            .collect();
        Self { recipes }
    }
}

/// One entry of a fixture plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureStep {
    Construct {
        label: String,
        binding: String,
        recipe: FixtureRecipe,
    },
    /// No recipe known for `label`; rendered as a comment.
    Placeholder { label: String },
}

impl FixtureStep {
    pub fn label(&self) -> &str {
        match self {
            Self::Construct { label, .. } | Self::Placeholder { label } => label,
        }
    }

    pub fn binding(&self) -> Option<&str> {
        match self {
            Self::Construct { binding, .. } => Some(binding),
            Self::Placeholder { .. } => None,
        }
    }
}

/// Dependency-ordered prerequisite steps for one artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixturePlan {
    steps: Vec<FixtureStep>,
}

impl FixturePlan {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[FixtureStep] {
        &self.steps
    }

    pub fn labels(&self) -> Vec<&str> {
        self.steps.iter().map(FixtureStep::label).collect()
    }

    /// Bindings of constructed steps, in order.
    pub fn bindings(&self) -> Vec<&str> {
        self.steps.iter().filter_map(FixtureStep::binding).collect()
    }

    /// Binding that constructs `label`, if one was planned.
    /// Binding of `label` if a step before `step` constructs it.
    pub fn binding_before(&self, step: usize, label: &str) -> Option<&str> {
        self.steps[..step.min(self.steps.len())]
            .iter()
            .find(|s| s.label() == label)
            .and_then(FixtureStep::binding)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn constructs(&self) -> usize {
        self.bindings().len()
    }
}

/// Expands required labels into a [`FixturePlan`]. Total: never fails.
#[derive(Debug, Clone, Copy)]
pub struct FixtureSynthesizer<'a> {
    book: &'a RecipeBook,
}

impl<'a> FixtureSynthesizer<'a> {
    pub fn new(book: &'a RecipeBook) -> Self {
        Self { book }
    }

    pub fn synthesize<S: AsRef<str>>(&self, required: &[S]) -> FixturePlan {
        let mut state = Expansion::default();
        for label in required {
            self.expand(label.as_ref(), &mut state);
        }
        FixturePlan { steps: state.steps }
    }

    fn expand(&self, label: &str, state: &mut Expansion) {
        if state.scheduled.contains(label) || state.stack.contains(label) {
            return;
        }

        let Some(recipe) = self.book.get(label) else {
            warn!(label, "UnrecognizedFixtureLabel: emitting placeholder");
            state.scheduled.insert(label.to_string());
            state.steps.push(FixtureStep::Placeholder {
                label: label.to_string(),
            });
            return;
        };

        state.stack.insert(label.to_string());
        for dependency in recipe.requires() {
            self.expand(dependency, state);
        }
        state.stack.remove(label);

        state.scheduled.insert(label.to_string());
        state.steps.push(FixtureStep::Construct {
            label: label.to_string(),
            binding: recipe.binding_name().to_string(),
            recipe: recipe.clone(),
        });
    }
}

#[derive(Default)]
struct Expansion {
    steps: Vec<FixtureStep>,
    scheduled: HashSet<String>,
    stack: HashSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(required: &[&str]) -> FixturePlan {
        let book = RecipeBook::builtin();
        FixtureSynthesizer::new(&book).synthesize(required)
    }

    #[test]
    fn reviews_order_is_vendor_product_user() {
        assert_eq!(plan(&["Product", "User"]).labels(), ["Vendor", "Product", "User"]);
    }

    #[test]
    fn shared_prerequisite_built_once() {
        let p = plan(&["Order", "MealPlan"]);
        assert_eq!(p.labels(), ["User", "Order", "MealPlan"]);
        assert_eq!(p.bindings(), ["user", "order", "mealPlan"]);
    }

    #[test]
    fn dependency_listed_after_dependant_still_first() {
        // B requires A, listed as [A, B] and [B, A]
        assert_eq!(plan(&["User", "Order"]).labels(), ["User", "Order"]);
        assert_eq!(plan(&["Order", "User"]).labels(), ["User", "Order"]);
    }

    #[test]
    fn unknown_label_becomes_placeholder() {
        let p = plan(&["Warehouse", "User"]);
        assert_eq!(
            p.steps()[0],
            FixtureStep::Placeholder {
                label: "Warehouse".into()
            }
        );
        assert_eq!(p.constructs(), 1);
        assert_eq!(p.binding_before(2, "Warehouse"), None);
        assert_eq!(p.binding_before(2, "User"), Some("user"));
        assert_eq!(p.binding_before(1, "User"), None);
    }

    #[test]
    fn duplicate_unknown_label_placed_once() {
        assert_eq!(plan(&["Ghost", "Ghost"]).len(), 1);
    }

    #[test]
    fn cyclic_recipes_terminate() {
        let mut book = RecipeBook::new();
        book.insert(FixtureRecipe::new("A").edge("SetB", "B")).unwrap();
        book.insert(FixtureRecipe::new("B").edge("SetA", "A")).unwrap();

        let p = FixtureSynthesizer::new(&book).synthesize(&["A"]);
        assert_eq!(p.labels(), ["B", "A"]);
    }

    #[test]
    fn every_step_prerequisites_come_first() {
        let book = RecipeBook::builtin();
        let p = FixtureSynthesizer::new(&book).synthesize(&["Cart", "Product", "Order", "MealPlan"]);
        for (i, step) in p.steps().iter().enumerate() {
            if let FixtureStep::Construct { recipe, .. } = step {
                for dep in recipe.requires() {
                    let pos = p.labels().iter().position(|l| l == dep).unwrap();
                    assert!(pos < i, "{dep} must precede {}", step.label());
                }
            }
        }
    }

    #[test]
    fn edge_adds_requirement_once() {
        let r = FixtureRecipe::new("X").edge("SetUser", "User").edge("AddUser", "User");
        assert_eq!(r.requires(), ["User"]);
        assert_eq!(r.binding_name(), "x");
    }
}
