//! GetCompletionStatusHandler - Query handler for per-track completion.

use std::sync::Arc;

use crate::domain::completion::{CompletionError, TrackCompletionStatus, TrackStatus};
use crate::domain::foundation::LearnerId;
use crate::domain::workshop::WorkshopCatalog;
use crate::ports::LearnerRepository;

#[derive(Debug, Clone)]
pub struct GetCompletionStatusQuery {
    pub learner_id: LearnerId,
}

/// Reports every catalog track, completed or not, in catalog order.
pub struct GetCompletionStatusHandler {
    catalog: Arc<WorkshopCatalog>,
    learners: Arc<dyn LearnerRepository>,
}

impl GetCompletionStatusHandler {
    pub fn new(catalog: Arc<WorkshopCatalog>, learners: Arc<dyn LearnerRepository>) -> Self {
        Self { catalog, learners }
    }

    pub async fn handle(
        &self,
        query: GetCompletionStatusQuery,
    ) -> Result<Vec<TrackCompletionStatus>, CompletionError> {
        let completions = self.learners.list_completions(query.learner_id).await?;

        Ok(self
            .catalog
            .tracks()
            .map(|definition| {
                let record = completions.iter().find(|c| c.track_id == definition.id);
                TrackCompletionStatus {
                    track_id: definition.id.clone(),
                    name: definition.name.clone(),
                    status: TrackStatus::from_record(record),
                    completed_at: record.map(|c| c.completed_at),
                }
            })
            .collect())
    }
}
