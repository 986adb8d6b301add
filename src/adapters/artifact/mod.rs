//! Artifact generator adapters.

mod http_generator;
mod mock;

pub use http_generator::{HttpArtifactConfig, HttpArtifactGenerator};
pub use mock::MockArtifactGenerator;
