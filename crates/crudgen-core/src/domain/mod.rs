// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for crudgen.
//!
//! Pure generation and patching logic. All I/O goes through ports defined in
//! the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Few crates**: std, thiserror, regex, serde derives, tracing
//! - **Immutable values**: registry, recipes and rule sets are built once
//!
// Public API - what the world sees
pub mod casing;
pub mod entities;
pub mod error;
pub mod fixtures;
pub mod instantiator;
pub mod registry;
pub mod render;
pub mod rewrite;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    artifact::{ArtifactSet, GeneratedArtifact, WritePolicy},
    blueprint::{Decl, MockMethod, MockType, ScenarioRow, Stmt, TableTest, TestFile, TestFunc},
    module::{DtoNames, ModuleConfig, ModuleConfigBuilder},
};

pub use error::{DomainError, ErrorCategory};

pub use fixtures::{
    Assignment, FixturePlan, FixtureRecipe, FixtureStep, FixtureSynthesizer, RecipeBook,
};
pub use instantiator::{DEFAULT_GO_MODULE, TemplateInstantiator, success_message};
pub use registry::ModuleRegistry;
pub use render::GoRenderer;
pub use rewrite::{EXPECTED_MESSAGE, PatchOutcome, RewriteRule, RuleSet};
pub use value_objects::{ArtifactKind, CrudOp, RuleKind};

pub use validation::DomainValidator;
