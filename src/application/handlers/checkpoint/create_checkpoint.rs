//! CreateCheckpointHandler - Command handler for snapshotting a learner.

use std::sync::Arc;

use crate::domain::checkpoint::{Checkpoint, CheckpointError};
use crate::domain::foundation::{LearnerId, Timestamp};
use crate::ports::{CheckpointRepository, LearnerRepository};

/// Command to capture a named checkpoint.
#[derive(Debug, Clone)]
pub struct CreateCheckpointCommand {
    pub learner_id: LearnerId,
    pub name: String,
    pub description: Option<String>,
}

/// Handler for checkpoint creation.
pub struct CreateCheckpointHandler {
    learners: Arc<dyn LearnerRepository>,
    checkpoints: Arc<dyn CheckpointRepository>,
}

impl CreateCheckpointHandler {
    pub fn new(
        learners: Arc<dyn LearnerRepository>,
        checkpoints: Arc<dyn CheckpointRepository>,
    ) -> Self {
        Self {
            learners,
            checkpoints,
        }
    }

    pub async fn handle(&self, cmd: CreateCheckpointCommand) -> Result<Checkpoint, CheckpointError> {
        if self.learners.find(cmd.learner_id).await?.is_none() {
            return Err(CheckpointError::learner_not_found(cmd.learner_id));
        }

        let data = self.checkpoints.capture(cmd.learner_id).await?;
        let checkpoint = Checkpoint::new(
            cmd.learner_id,
            &cmd.name,
            cmd.description.as_deref(),
            data,
            Timestamp::now(),
        )?;
        self.checkpoints.save(&checkpoint).await?;

        tracing::info!(
            learner_id = %cmd.learner_id,
            checkpoint_id = %checkpoint.id,
            steps = checkpoint.data.step_data.len(),
            "Created checkpoint"
        );

        Ok(checkpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryWorkshopStore;
    use crate::domain::foundation::{StepId, TrackId};
    use crate::domain::learner::Learner;
    use crate::domain::step_data::StepKey;
    use crate::ports::StepDataRepository;
    use serde_json::json;

    fn learner() -> LearnerId {
        LearnerId::new(31).unwrap()
    }

    async fn seeded_store() -> Arc<InMemoryWorkshopStore> {
        let store = Arc::new(InMemoryWorkshopStore::new());
        store.insert_learner(Learner::new(learner(), false)).await;
        let key = StepKey::new(learner(), TrackId::new("ast").unwrap(), StepId::new("1-1").unwrap());
        store
            .upsert(&key, &json!({"answer": 42}), None, Timestamp::now())
            .await
            .unwrap();
        store
    }

    fn cmd(name: &str) -> CreateCheckpointCommand {
        CreateCheckpointCommand {
            learner_id: learner(),
            name: name.to_string(),
            description: Some("before module 2".to_string()),
        }
    }

    #[tokio::test]
    async fn captures_and_stores_snapshot() {
        let store = seeded_store().await;
        let handler = CreateCheckpointHandler::new(store.clone(), store.clone());

        let checkpoint = handler.handle(cmd("Baseline")).await.unwrap();

        assert_eq!(checkpoint.name, "Baseline");
        assert_eq!(checkpoint.data.step_data.len(), 1);
        let stored = CheckpointRepository::find(&*store, &checkpoint.id)
            .await
            .unwrap();
        assert_eq!(stored, Some(checkpoint));
    }

    #[tokio::test]
    async fn blank_name_is_rejected_and_nothing_stored() {
        let store = seeded_store().await;
        let handler = CreateCheckpointHandler::new(store.clone(), store.clone());

        let result = handler.handle(cmd("   ")).await;

        assert!(matches!(result, Err(CheckpointError::ValidationFailed { .. })));
        assert!(CheckpointRepository::list_for_learner(&*store, learner())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn unknown_learner_is_not_found() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        let handler = CreateCheckpointHandler::new(store.clone(), store);
        let result = handler.handle(cmd("Baseline")).await;
        assert_eq!(result.unwrap_err(), CheckpointError::learner_not_found(learner()));
    }
}
