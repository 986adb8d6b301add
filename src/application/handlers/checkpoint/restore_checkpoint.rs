//! RestoreCheckpointHandler - Command handler for rolling a learner back to
//! a checkpoint.
//!
//! The restore replaces the learner's progress, step data, completions and
//! collaborator records in one atomic operation. Other checkpoints are
//! untouched.

use std::sync::Arc;

use crate::domain::checkpoint::{Checkpoint, CheckpointError};
use crate::domain::foundation::{CheckpointId, LearnerId};
use crate::ports::CheckpointRepository;

#[derive(Debug, Clone)]
pub struct RestoreCheckpointCommand {
    pub learner_id: LearnerId,
    pub checkpoint_id: CheckpointId,
}

pub struct RestoreCheckpointHandler {
    checkpoints: Arc<dyn CheckpointRepository>,
}

impl RestoreCheckpointHandler {
    pub fn new(checkpoints: Arc<dyn CheckpointRepository>) -> Self {
        Self { checkpoints }
    }

    pub async fn handle(&self, cmd: RestoreCheckpointCommand) -> Result<Checkpoint, CheckpointError> {
        let checkpoint = self
            .checkpoints
            .find(&cmd.checkpoint_id)
            .await?
            .filter(|c| c.belongs_to(cmd.learner_id))
            .ok_or(CheckpointError::NotFound(cmd.checkpoint_id))?;

        if let Err(e) = self.checkpoints.restore(cmd.learner_id, &checkpoint.data).await {
            tracing::error!(
                learner_id = %cmd.learner_id,
                checkpoint_id = %cmd.checkpoint_id,
                error = %e,
                "Checkpoint restore failed and was rolled back"
            );
            return Err(e.into());
        }

        tracing::info!(
            learner_id = %cmd.learner_id,
            checkpoint_id = %cmd.checkpoint_id,
            "Restored checkpoint"
        );

        Ok(checkpoint)
    }
}
