//! ReclaimTombstonesHandler - Hard-deletes step rows tombstoned longer than
//! the retention window.
//!
//! The outcome is always reported as a value. Storage failures become
//! `ReclaimOutcome::Failed` so a scheduled sweep never aborts.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::step_data::ReclaimOutcome;
use crate::ports::StepDataRepository;

/// Retention applied when the caller does not specify one.
pub const DEFAULT_RETENTION_MONTHS: u32 = 6;

/// Longest accepted retention. Larger values are clamped to it so the
/// cutoff stays inside the storable timestamp range.
pub const MAX_RETENTION_MONTHS: u32 = 1200;

#[derive(Debug, Clone, Default)]
pub struct ReclaimTombstonesCommand {
    /// Calendar months a tombstone is kept. Defaults to six, capped at
    /// [`MAX_RETENTION_MONTHS`].
    pub retention_months: Option<u32>,
}

pub struct ReclaimTombstonesHandler {
    steps: Arc<dyn StepDataRepository>,
}

impl ReclaimTombstonesHandler {
    pub fn new(steps: Arc<dyn StepDataRepository>) -> Self {
        Self { steps }
    }

    pub async fn handle(&self, cmd: ReclaimTombstonesCommand) -> ReclaimOutcome {
        self.reclaim_at(cmd, Timestamp::now()).await
    }

    /// Runs the reclaim against an explicit clock.
    pub async fn reclaim_at(&self, cmd: ReclaimTombstonesCommand, now: Timestamp) -> ReclaimOutcome {
        let months = cmd
            .retention_months
            .unwrap_or(DEFAULT_RETENTION_MONTHS)
            .min(MAX_RETENTION_MONTHS);
        let cutoff = now.minus_months(months);

        match self.steps.purge_tombstoned_before(cutoff).await {
            Ok(count) => {
                tracing::info!(
                    retention_months = months,
                    cutoff = %cutoff,
                    count,
                    "Reclaimed tombstoned step data"
                );
                ReclaimOutcome::Reclaimed { count }
            }
            Err(e) => {
                tracing::error!(
                    retention_months = months,
                    error = %e,
                    "Tombstone reclaim failed"
                );
                ReclaimOutcome::Failed { reason: e.message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryWorkshopStore;
    use crate::domain::foundation::{DomainError, LearnerId, StepId, TrackId};
    use crate::domain::step_data::{StepKey, StepRecord};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct FailingStepDataRepository;

    #[async_trait]
    impl StepDataRepository for FailingStepDataRepository {
        async fn upsert(
            &self,
            _key: &StepKey,
            _payload: &Value,
            _expected_version: Option<i32>,
            _now: Timestamp,
        ) -> Result<StepRecord, DomainError> {
            Err(DomainError::database("unavailable"))
        }

        async fn find(&self, _key: &StepKey) -> Result<Option<StepRecord>, DomainError> {
            Err(DomainError::database("unavailable"))
        }

        async fn list_for_track(
            &self,
            _learner_id: LearnerId,
            _track_id: &TrackId,
        ) -> Result<Vec<StepRecord>, DomainError> {
            Err(DomainError::database("unavailable"))
        }

        async fn list_for_learner(&self, _learner_id: LearnerId) -> Result<Vec<StepRecord>, DomainError> {
            Err(DomainError::database("unavailable"))
        }

        async fn hard_delete_for_learner(&self, _learner_id: LearnerId) -> Result<u64, DomainError> {
            Err(DomainError::database("unavailable"))
        }

        async fn soft_delete_for_learner(
            &self,
            _learner_id: LearnerId,
            _at: Timestamp,
        ) -> Result<u64, DomainError> {
            Err(DomainError::database("unavailable"))
        }

        async fn purge_tombstoned_before(&self, _cutoff: Timestamp) -> Result<u64, DomainError> {
            Err(DomainError::database("unavailable"))
        }
    }

    fn record(step: &str, tombstoned_at: Option<Timestamp>) -> StepRecord {
        let key = StepKey::new(
            LearnerId::new(1).unwrap(),
            TrackId::new("ast").unwrap(),
            StepId::new(step).unwrap(),
        );
        let mut record = StepRecord::new(key, json!({}), Timestamp::now().minus_days(400));
        if let Some(at) = tombstoned_at {
            record.tombstone(at);
        }
        record
    }

    #[tokio::test]
    async fn removes_only_tombstones_older_than_retention() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        let now = Timestamp::now();
        store.insert_step_record(record("1-1", None)).await;
        store.insert_step_record(record("1-2", Some(now.minus_days(30)))).await;
        store.insert_step_record(record("1-3", Some(now.minus_months(7)))).await;
        let handler = ReclaimTombstonesHandler::new(store.clone());

        let outcome = handler.reclaim_at(ReclaimTombstonesCommand::default(), now).await;

        assert_eq!(outcome, ReclaimOutcome::Reclaimed { count: 1 });
        assert_eq!(store.step_row_count().await, 2);
    }

    #[tokio::test]
    async fn custom_retention_widens_the_window() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        let now = Timestamp::now();
        store.insert_step_record(record("1-2", Some(now.minus_days(45)))).await;
        let handler = ReclaimTombstonesHandler::new(store.clone());

        let outcome = handler
            .reclaim_at(
                ReclaimTombstonesCommand {
                    retention_months: Some(1),
                },
                now,
            )
            .await;

        assert_eq!(outcome, ReclaimOutcome::Reclaimed { count: 1 });
    }

    /// Records the cutoff it was asked to purge before.
    #[derive(Default)]
    struct CutoffRecorder {
        cutoff: std::sync::Mutex<Option<Timestamp>>,
    }

    #[async_trait]
    impl StepDataRepository for CutoffRecorder {
        async fn upsert(
            &self,
            _key: &StepKey,
            _payload: &Value,
            _expected_version: Option<i32>,
            _now: Timestamp,
        ) -> Result<StepRecord, DomainError> {
            Err(DomainError::database("unused"))
        }

        async fn find(&self, _key: &StepKey) -> Result<Option<StepRecord>, DomainError> {
            Ok(None)
        }

        async fn list_for_track(
            &self,
            _learner_id: LearnerId,
            _track_id: &TrackId,
        ) -> Result<Vec<StepRecord>, DomainError> {
            Ok(Vec::new())
        }

        async fn list_for_learner(&self, _learner_id: LearnerId) -> Result<Vec<StepRecord>, DomainError> {
            Ok(Vec::new())
        }

        async fn hard_delete_for_learner(&self, _learner_id: LearnerId) -> Result<u64, DomainError> {
            Ok(0)
        }

        async fn soft_delete_for_learner(
            &self,
            _learner_id: LearnerId,
            _at: Timestamp,
        ) -> Result<u64, DomainError> {
            Ok(0)
        }

        async fn purge_tombstoned_before(&self, cutoff: Timestamp) -> Result<u64, DomainError> {
            *self.cutoff.lock().unwrap() = Some(cutoff);
            Ok(0)
        }
    }

    #[tokio::test]
    async fn oversized_retention_is_clamped() {
        let recorder = Arc::new(CutoffRecorder::default());
        let handler = ReclaimTombstonesHandler::new(recorder.clone());
        let now = Timestamp::now();

        let outcome = handler
            .reclaim_at(
                ReclaimTombstonesCommand {
                    retention_months: Some(u32::MAX),
                },
                now,
            )
            .await;

        assert_eq!(outcome, ReclaimOutcome::Reclaimed { count: 0 });
        let cutoff = recorder.cutoff.lock().unwrap().unwrap();
        assert_eq!(cutoff, now.minus_months(MAX_RETENTION_MONTHS));
    }

    #[tokio::test]
    async fn storage_failure_is_reported_not_raised() {
        let handler = ReclaimTombstonesHandler::new(Arc::new(FailingStepDataRepository));

        let outcome = handler.handle(ReclaimTombstonesCommand::default()).await;

        assert!(outcome.is_failure());
        assert_eq!(
            outcome,
            ReclaimOutcome::Failed {
                reason: "unavailable".to_string()
            }
        );
    }
}
