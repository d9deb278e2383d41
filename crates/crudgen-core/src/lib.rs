//! crudgen core - Hexagonal Architecture Implementation
//!
//! Domain and application layers for the crudgen test scaffolder and
//! convention patcher, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           crudgen-cli (CLI)             │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │    (GenerateService, PatchService)      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │             (Filesystem)                │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    crudgen-adapters (Infrastructure)    │
//! │ (LocalFilesystem, MemoryFilesystem,...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ModuleRegistry, FixtureSynthesizer,    │
//! │  TemplateInstantiator, RuleSet)         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crudgen_core::prelude::*;
//!
//! let registry = ModuleRegistry::builtin();
//! let service = GenerateService::new(filesystem, "backend/modules");
//! let report = service.generate_all(&registry);
//! println!("{:?}", report.summary());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BatchReport, ExistingFileGuard, GenerateService, Outcome, PatchService, TargetReport,
        ports::Filesystem,
    };
    pub use crate::domain::{
        ArtifactKind, FixturePlan, FixtureSynthesizer, ModuleConfig, ModuleRegistry, RecipeBook,
        RewriteRule, RuleKind, RuleSet, TemplateInstantiator,
    };
    pub use crate::error::{CrudgenError, CrudgenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
