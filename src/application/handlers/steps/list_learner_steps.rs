//! ListLearnerStepsHandler - Operator query over every row of a learner,
//! tombstones included.

use std::sync::Arc;

use crate::domain::foundation::LearnerId;
use crate::domain::step_data::{StepDataError, StepRecord};
use crate::ports::StepDataRepository;

#[derive(Debug, Clone)]
pub struct ListLearnerStepsQuery {
    pub learner_id: LearnerId,
}

pub struct ListLearnerStepsHandler {
    steps: Arc<dyn StepDataRepository>,
}

impl ListLearnerStepsHandler {
    pub fn new(steps: Arc<dyn StepDataRepository>) -> Self {
        Self { steps }
    }

    pub async fn handle(
        &self,
        query: ListLearnerStepsQuery,
    ) -> Result<Vec<StepRecord>, StepDataError> {
        Ok(self.steps.list_for_learner(query.learner_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryWorkshopStore;
    use crate::domain::foundation::{StepId, Timestamp, TrackId};
    use crate::domain::step_data::StepKey;
    use serde_json::json;

    #[tokio::test]
    async fn includes_tombstoned_rows() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        let learner = LearnerId::new(4).unwrap();
        for (step, tombstoned) in [("1-1", false), ("1-2", true)] {
            let key = StepKey::new(
                learner,
                TrackId::new("ast").unwrap(),
                StepId::new(step).unwrap(),
            );
            let mut record = StepRecord::new(key, json!({}), Timestamp::now());
            if tombstoned {
                record.tombstone(Timestamp::now());
            }
            store.insert_step_record(record).await;
        }

        let rows = ListLearnerStepsHandler::new(store)
            .handle(ListLearnerStepsQuery { learner_id: learner })
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows.iter().filter(|r| r.is_tombstoned()).count(), 1);
    }
}
