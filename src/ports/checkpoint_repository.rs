//! Checkpoint repository port.
//!
//! Besides storing checkpoints, this port owns the two operations that span
//! every learner-scoped store: `capture` (one consistent read) and `restore`
//! (one atomic replace). Splitting them across the individual repositories
//! would make a partial restore possible.

use async_trait::async_trait;

use crate::domain::checkpoint::{Checkpoint, CheckpointData};
use crate::domain::foundation::{CheckpointId, DomainError, LearnerId};

/// Repository port for checkpoints and whole-learner snapshots.
#[async_trait]
pub trait CheckpointRepository: Send + Sync {
    /// Read the learner's full state in one consistent view.
    async fn capture(&self, learner_id: LearnerId) -> Result<CheckpointData, DomainError>;

    /// Store a new checkpoint.
    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), DomainError>;

    /// A learner's checkpoints, newest first.
    async fn list_for_learner(&self, learner_id: LearnerId) -> Result<Vec<Checkpoint>, DomainError>;

    /// Find a checkpoint by id regardless of owner.
    async fn find(&self, id: &CheckpointId) -> Result<Option<Checkpoint>, DomainError>;

    /// Delete a checkpoint owned by the learner. Returns `false` if no
    /// matching checkpoint existed.
    async fn delete(&self, learner_id: LearnerId, id: &CheckpointId) -> Result<bool, DomainError>;

    /// Replace the learner's progress, step data, collaborator records,
    /// completions and aggregate percentage with `data`.
    ///
    /// Other checkpoints are untouched. Either everything is replaced or,
    /// on error, nothing is.
    async fn restore(&self, learner_id: LearnerId, data: &CheckpointData) -> Result<(), DomainError>;
}
