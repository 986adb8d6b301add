//! UpsertStepHandler - Command handler for writing a step payload.

use serde_json::Value;
use std::sync::Arc;

use super::resolve_key;
use crate::domain::completion::TrackStatus;
use crate::domain::foundation::{LearnerId, Timestamp};
use crate::domain::step_data::{validate_payload, StepDataError, StepRecord};
use crate::domain::workshop::WorkshopCatalog;
use crate::ports::{LearnerRepository, StepDataRepository};

/// Command to insert or update one step's payload.
#[derive(Debug, Clone)]
pub struct UpsertStepCommand {
    pub learner_id: LearnerId,
    pub track_id: String,
    pub step_id: String,
    pub payload: Value,
    /// Optimistic concurrency guard. `Some(0)` requires the row to be absent.
    pub expected_version: Option<i32>,
}

/// Handler for step upserts.
pub struct UpsertStepHandler {
    catalog: Arc<WorkshopCatalog>,
    learners: Arc<dyn LearnerRepository>,
    steps: Arc<dyn StepDataRepository>,
}

impl UpsertStepHandler {
    pub fn new(
        catalog: Arc<WorkshopCatalog>,
        learners: Arc<dyn LearnerRepository>,
        steps: Arc<dyn StepDataRepository>,
    ) -> Self {
        Self {
            catalog,
            learners,
            steps,
        }
    }

    pub async fn handle(&self, cmd: UpsertStepCommand) -> Result<StepRecord, StepDataError> {
        // 1. Validate the request
        let key = resolve_key(&self.catalog, cmd.learner_id, &cmd.track_id, &cmd.step_id)?;
        validate_payload(&cmd.payload)?;
        if let Some(expected) = cmd.expected_version {
            if expected < 0 {
                return Err(StepDataError::validation(
                    "expected_version",
                    "Expected version cannot be negative",
                ));
            }
        }

        // 2. Learner must exist and the track must still accept writes
        if self.learners.find(cmd.learner_id).await?.is_none() {
            return Err(StepDataError::learner_not_found(cmd.learner_id));
        }
        let completion = self
            .learners
            .find_completion(cmd.learner_id, &key.track_id)
            .await?;
        if !TrackStatus::from_record(completion.as_ref()).accepts_step_writes() {
            return Err(StepDataError::locked(key.track_id));
        }

        // 3. Persist
        let record = self
            .steps
            .upsert(&key, &cmd.payload, cmd.expected_version, Timestamp::now())
            .await?;

        tracing::debug!(
            learner_id = %cmd.learner_id,
            track = %key.track_id,
            step = %key.step_id,
            version = record.version,
            "Upserted step data"
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryWorkshopStore;
    use crate::domain::completion::CompletionRecord;
    use crate::domain::foundation::TrackId;
    use crate::domain::learner::Learner;
    use serde_json::json;

    fn learner() -> LearnerId {
        LearnerId::new(11).unwrap()
    }

    async fn setup() -> (Arc<InMemoryWorkshopStore>, UpsertStepHandler) {
        let store = Arc::new(InMemoryWorkshopStore::new());
        store.insert_learner(Learner::new(learner(), false)).await;
        let handler = UpsertStepHandler::new(
            Arc::new(WorkshopCatalog::builtin().clone()),
            store.clone(),
            store.clone(),
        );
        (store, handler)
    }

    fn cmd(payload: Value, expected_version: Option<i32>) -> UpsertStepCommand {
        UpsertStepCommand {
            learner_id: learner(),
            track_id: "ast".to_string(),
            step_id: "2-3".to_string(),
            payload,
            expected_version,
        }
    }

    #[tokio::test]
    async fn repeated_upserts_keep_one_row_and_bump_version() {
        let (store, handler) = setup().await;

        let first = handler.handle(cmd(json!({"a": 1}), None)).await.unwrap();
        let second = handler.handle(cmd(json!({"a": 2}), None)).await.unwrap();

        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(second.payload, json!({"a": 2}));
        assert_eq!(store.step_row_count().await, 1);
    }

    #[tokio::test]
    async fn matching_expected_version_is_accepted() {
        let (_, handler) = setup().await;
        handler.handle(cmd(json!({}), Some(0))).await.unwrap();

        let record = handler.handle(cmd(json!({"b": true}), Some(1))).await.unwrap();

        assert_eq!(record.version, 2);
    }

    #[tokio::test]
    async fn stale_expected_version_is_rejected() {
        let (_, handler) = setup().await;
        handler.handle(cmd(json!({}), None)).await.unwrap();
        handler.handle(cmd(json!({}), None)).await.unwrap();

        let result = handler.handle(cmd(json!({}), Some(1))).await;

        assert_eq!(result.unwrap_err(), StepDataError::version_conflict(1, Some(2)));
    }

    #[tokio::test]
    async fn non_object_payload_is_rejected() {
        let (store, handler) = setup().await;
        let result = handler.handle(cmd(json!([1, 2]), None)).await;
        assert!(matches!(result, Err(StepDataError::ValidationFailed { .. })));
        assert_eq!(store.step_row_count().await, 0);
    }

    #[tokio::test]
    async fn negative_expected_version_is_rejected() {
        let (_, handler) = setup().await;
        let result = handler.handle(cmd(json!({}), Some(-1))).await;
        assert!(matches!(result, Err(StepDataError::ValidationFailed { .. })));
    }

    #[tokio::test]
    async fn unknown_learner_is_not_found() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        let handler = UpsertStepHandler::new(
            Arc::new(WorkshopCatalog::builtin().clone()),
            store.clone(),
            store,
        );
        let result = handler.handle(cmd(json!({}), None)).await;
        assert_eq!(result.unwrap_err(), StepDataError::learner_not_found(learner()));
    }

    #[tokio::test]
    async fn unknown_track_is_rejected() {
        let (_, handler) = setup().await;
        let mut command = cmd(json!({}), None);
        command.track_id = "zz".to_string();
        let result = handler.handle(command).await;
        assert!(matches!(result, Err(StepDataError::UnknownTrack(_))));
    }

    #[tokio::test]
    async fn completed_track_is_locked() {
        let (store, handler) = setup().await;
        let track = TrackId::new("ast").unwrap();
        store
            .record_completion(&CompletionRecord::new(learner(), track.clone(), Timestamp::now()))
            .await
            .unwrap();

        let result = handler.handle(cmd(json!({}), None)).await;

        assert_eq!(result.unwrap_err(), StepDataError::locked(track));
    }
}
