//! Artifact generator port.
//!
//! Produces the summary artifact (e.g. a visual card) for a completed track.
//! Failures are expected and never roll back a completion.

use async_trait::async_trait;

use crate::domain::completion::ArtifactReference;
use crate::domain::foundation::{DomainError, ErrorCode, LearnerId, TrackId};

/// Builds the error returned when generation fails.
pub fn artifact_failed(message: impl Into<String>) -> DomainError {
    DomainError::new(ErrorCode::ArtifactGenerationFailed, message)
}

/// Port for the external artifact generator.
#[async_trait]
pub trait ArtifactGenerator: Send + Sync {
    /// Generate the summary artifact and return where it lives.
    ///
    /// # Errors
    ///
    /// - `ArtifactGenerationFailed` when the collaborator fails or is unreachable
    async fn generate(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
    ) -> Result<ArtifactReference, DomainError>;
}
