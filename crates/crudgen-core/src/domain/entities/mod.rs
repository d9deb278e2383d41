pub mod artifact;
pub mod blueprint;
pub mod module;

pub use crate::domain::DomainError;
pub use artifact::{ArtifactSet, GeneratedArtifact, WritePolicy};
pub use blueprint::TestFile;
pub use module::{DtoNames, ModuleConfig, ModuleConfigBuilder};
