//! ListStepsHandler - Query handler for a learner's live rows on one track.

use std::sync::Arc;

use super::resolve_track;
use crate::domain::foundation::LearnerId;
use crate::domain::step_data::{StepDataError, StepRecord};
use crate::domain::workshop::WorkshopCatalog;
use crate::ports::StepDataRepository;

#[derive(Debug, Clone)]
pub struct ListStepsQuery {
    pub learner_id: LearnerId,
    pub track_id: String,
}

pub struct ListStepsHandler {
    catalog: Arc<WorkshopCatalog>,
    steps: Arc<dyn StepDataRepository>,
}

impl ListStepsHandler {
    pub fn new(catalog: Arc<WorkshopCatalog>, steps: Arc<dyn StepDataRepository>) -> Self {
        Self { catalog, steps }
    }

    pub async fn handle(&self, query: ListStepsQuery) -> Result<Vec<StepRecord>, StepDataError> {
        let track_id = resolve_track(&self.catalog, &query.track_id)?;
        Ok(self.steps.list_for_track(query.learner_id, &track_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryWorkshopStore;
    use crate::domain::foundation::{StepId, Timestamp, TrackId};
    use crate::domain::step_data::StepKey;
    use serde_json::json;

    fn record(learner: i64, track: &str, step: &str, tombstoned: bool) -> StepRecord {
        let key = StepKey::new(
            LearnerId::new(learner).unwrap(),
            TrackId::new(track).unwrap(),
            StepId::new(step).unwrap(),
        );
        let mut record = StepRecord::new(key, json!({}), Timestamp::now());
        if tombstoned {
            record.tombstone(Timestamp::now());
        }
        record
    }

    #[tokio::test]
    async fn lists_live_rows_of_track_ordered_by_step() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        for r in [
            record(1, "ast", "2-1", false),
            record(1, "ast", "1-1", false),
            record(1, "ast", "3-1", true),
            record(1, "ia", "ia-1-1", false),
            record(2, "ast", "1-1", false),
        ] {
            store.insert_step_record(r).await;
        }
        let handler = ListStepsHandler::new(Arc::new(WorkshopCatalog::builtin().clone()), store);

        let rows = handler
            .handle(ListStepsQuery {
                learner_id: LearnerId::new(1).unwrap(),
                track_id: "ast".to_string(),
            })
            .await
            .unwrap();

        let steps: Vec<&str> = rows.iter().map(|r| r.key.step_id.as_str()).collect();
        assert_eq!(steps, vec!["1-1", "2-1"]);
    }

    #[tokio::test]
    async fn unknown_track_is_rejected() {
        let handler = ListStepsHandler::new(
            Arc::new(WorkshopCatalog::builtin().clone()),
            Arc::new(InMemoryWorkshopStore::new()),
        );
        let result = handler
            .handle(ListStepsQuery {
                learner_id: LearnerId::new(1).unwrap(),
                track_id: "nope".to_string(),
            })
            .await;
        assert!(matches!(result, Err(StepDataError::UnknownTrack(_))));
    }
}
