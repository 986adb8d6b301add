//! Learner repository port.
//!
//! Reads learner classification and owns per-track completion records.

use async_trait::async_trait;

use crate::domain::completion::{ArtifactReference, CompletionRecord};
use crate::domain::foundation::{DomainError, LearnerId, TrackId};
use crate::domain::learner::Learner;

/// Repository port for learners and their completion records.
#[async_trait]
pub trait LearnerRepository: Send + Sync {
    /// Find a learner. Returns `None` if unknown.
    async fn find(&self, learner_id: LearnerId) -> Result<Option<Learner>, DomainError>;

    /// All completion records of a learner.
    async fn list_completions(
        &self,
        learner_id: LearnerId,
    ) -> Result<Vec<CompletionRecord>, DomainError>;

    /// The completion record for one track, if any.
    async fn find_completion(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
    ) -> Result<Option<CompletionRecord>, DomainError>;

    /// Persist a completion record, first writer wins.
    ///
    /// Returns `false` if a record for the (learner, track) already existed;
    /// the stored record is left untouched in that case.
    async fn record_completion(&self, record: &CompletionRecord) -> Result<bool, DomainError>;

    /// Attach a generated artifact to an existing completion record.
    async fn attach_artifact(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
        artifact: &ArtifactReference,
    ) -> Result<(), DomainError>;
}
