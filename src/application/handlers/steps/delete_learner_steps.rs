//! DeleteLearnerStepsHandler - Command handler for removing a learner's
//! step data.
//!
//! Test learners are hard-deleted. Everyone else is tombstoned and
//! reclaimed later by the cleanup sweep.

use std::sync::Arc;

use crate::domain::foundation::{LearnerId, Timestamp};
use crate::domain::step_data::{DeleteStrategy, DeletionSummary, StepDataError};
use crate::ports::{LearnerRepository, StepDataRepository};

#[derive(Debug, Clone)]
pub struct DeleteLearnerStepsCommand {
    pub learner_id: LearnerId,
}

pub struct DeleteLearnerStepsHandler {
    learners: Arc<dyn LearnerRepository>,
    steps: Arc<dyn StepDataRepository>,
}

impl DeleteLearnerStepsHandler {
    pub fn new(learners: Arc<dyn LearnerRepository>, steps: Arc<dyn StepDataRepository>) -> Self {
        Self { learners, steps }
    }

    pub async fn handle(
        &self,
        cmd: DeleteLearnerStepsCommand,
    ) -> Result<DeletionSummary, StepDataError> {
        let learner = self
            .learners
            .find(cmd.learner_id)
            .await?
            .ok_or(StepDataError::LearnerNotFound(cmd.learner_id))?;

        let strategy = DeleteStrategy::for_learner(learner.is_test_learner);
        let affected_rows = match strategy {
            DeleteStrategy::Hard => self.steps.hard_delete_for_learner(learner.id).await?,
            DeleteStrategy::Soft => {
                self.steps
                    .soft_delete_for_learner(learner.id, Timestamp::now())
                    .await?
            }
        };

        tracing::info!(
            learner_id = %learner.id,
            strategy = ?strategy,
            affected_rows,
            "Deleted learner step data"
        );

        Ok(DeletionSummary {
            strategy,
            affected_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryWorkshopStore;
    use crate::domain::foundation::{StepId, TrackId};
    use crate::domain::learner::Learner;
    use crate::domain::step_data::StepKey;
    use serde_json::json;

    async fn seeded(is_test: bool) -> (Arc<InMemoryWorkshopStore>, LearnerId) {
        let store = Arc::new(InMemoryWorkshopStore::new());
        let learner = LearnerId::new(21).unwrap();
        store.insert_learner(Learner::new(learner, is_test)).await;
        for step in ["1-1", "1-2"] {
            let key = StepKey::new(learner, TrackId::new("ast").unwrap(), StepId::new(step).unwrap());
            store
                .upsert(&key, &json!({}), None, Timestamp::now())
                .await
                .unwrap();
        }
        (store, learner)
    }

    #[tokio::test]
    async fn test_learner_rows_are_hard_deleted() {
        let (store, learner) = seeded(true).await;
        let handler = DeleteLearnerStepsHandler::new(store.clone(), store.clone());

        let summary = handler
            .handle(DeleteLearnerStepsCommand { learner_id: learner })
            .await
            .unwrap();

        assert_eq!(summary.strategy, DeleteStrategy::Hard);
        assert_eq!(summary.affected_rows, 2);
        assert_eq!(store.step_row_count().await, 0);
    }

    #[tokio::test]
    async fn real_learner_rows_are_tombstoned() {
        let (store, learner) = seeded(false).await;
        let handler = DeleteLearnerStepsHandler::new(store.clone(), store.clone());

        let summary = handler
            .handle(DeleteLearnerStepsCommand { learner_id: learner })
            .await
            .unwrap();

        assert_eq!(summary.strategy, DeleteStrategy::Soft);
        assert_eq!(summary.affected_rows, 2);
        let rows = StepDataRepository::list_for_learner(&*store, learner)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.is_tombstoned()));
    }

    #[tokio::test]
    async fn unknown_learner_is_not_found() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        let handler = DeleteLearnerStepsHandler::new(store.clone(), store);
        let id = LearnerId::new(99).unwrap();
        let result = handler.handle(DeleteLearnerStepsCommand { learner_id: id }).await;
        assert_eq!(result.unwrap_err(), StepDataError::learner_not_found(id));
    }
}
