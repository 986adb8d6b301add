//! DeleteCheckpointHandler - Command handler for removing a checkpoint.

use std::sync::Arc;

use crate::domain::checkpoint::CheckpointError;
use crate::domain::foundation::{CheckpointId, LearnerId};
use crate::ports::CheckpointRepository;

#[derive(Debug, Clone)]
pub struct DeleteCheckpointCommand {
    pub learner_id: LearnerId,
    pub checkpoint_id: CheckpointId,
}

pub struct DeleteCheckpointHandler {
    checkpoints: Arc<dyn CheckpointRepository>,
}

impl DeleteCheckpointHandler {
    pub fn new(checkpoints: Arc<dyn CheckpointRepository>) -> Self {
        Self { checkpoints }
    }

    pub async fn handle(&self, cmd: DeleteCheckpointCommand) -> Result<(), CheckpointError> {
        if !self
            .checkpoints
            .delete(cmd.learner_id, &cmd.checkpoint_id)
            .await?
        {
            return Err(CheckpointError::not_found(cmd.checkpoint_id));
        }

        tracing::info!(
            learner_id = %cmd.learner_id,
            checkpoint_id = %cmd.checkpoint_id,
            "Deleted checkpoint"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryWorkshopStore;
    use crate::domain::checkpoint::{Checkpoint, CheckpointData};
    use crate::domain::foundation::Timestamp;

    async fn store_with_checkpoint(owner: LearnerId) -> (Arc<InMemoryWorkshopStore>, CheckpointId) {
        let store = Arc::new(InMemoryWorkshopStore::new());
        let cp = Checkpoint::new(owner, "snap", None, CheckpointData::default(), Timestamp::now())
            .unwrap();
        CheckpointRepository::save(&*store, &cp).await.unwrap();
        (store, cp.id)
    }

    #[tokio::test]
    async fn owner_can_delete() {
        let owner = LearnerId::new(1).unwrap();
        let (store, id) = store_with_checkpoint(owner).await;
        let handler = DeleteCheckpointHandler::new(store.clone());

        handler
            .handle(DeleteCheckpointCommand {
                learner_id: owner,
                checkpoint_id: id,
            })
            .await
            .unwrap();

        assert!(CheckpointRepository::find(&*store, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn other_learner_gets_not_found_and_checkpoint_survives() {
        let owner = LearnerId::new(1).unwrap();
        let (store, id) = store_with_checkpoint(owner).await;
        let handler = DeleteCheckpointHandler::new(store.clone());

        let result = handler
            .handle(DeleteCheckpointCommand {
                learner_id: LearnerId::new(2).unwrap(),
                checkpoint_id: id,
            })
            .await;

        assert_eq!(result.unwrap_err(), CheckpointError::not_found(id));
        assert!(CheckpointRepository::find(&*store, &id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_checkpoint_is_not_found() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        let id = CheckpointId::new();
        let result = DeleteCheckpointHandler::new(store)
            .handle(DeleteCheckpointCommand {
                learner_id: LearnerId::new(1).unwrap(),
                checkpoint_id: id,
            })
            .await;
        assert_eq!(result.unwrap_err(), CheckpointError::not_found(id));
    }
}
