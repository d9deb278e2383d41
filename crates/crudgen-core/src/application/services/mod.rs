//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the two
//! use cases: generate test files, and patch existing ones.

pub mod generate_service;
pub mod patch_service;

pub use generate_service::GenerateService;
pub use patch_service::{DEFAULT_PATCH_TARGETS, PatchService, default_targets};
