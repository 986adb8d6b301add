//! GetProgressHandler - Query handler for a learner's track progress.

use std::sync::Arc;

use crate::domain::foundation::{LearnerId, Timestamp};
use crate::domain::progress::{NavigationProgress, ProgressError};
use crate::domain::workshop::WorkshopCatalog;
use crate::ports::{LearnerRepository, ProgressRepository};

/// Query for progress on one track.
#[derive(Debug, Clone)]
pub struct GetProgressQuery {
    pub learner_id: LearnerId,
    pub track_id: String,
}

/// Returns the stored record, or the track default without persisting it.
pub struct GetProgressHandler {
    catalog: Arc<WorkshopCatalog>,
    learners: Arc<dyn LearnerRepository>,
    repository: Arc<dyn ProgressRepository>,
}

impl GetProgressHandler {
    pub fn new(
        catalog: Arc<WorkshopCatalog>,
        learners: Arc<dyn LearnerRepository>,
        repository: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            catalog,
            learners,
            repository,
        }
    }

    pub async fn handle(&self, query: GetProgressQuery) -> Result<NavigationProgress, ProgressError> {
        let definition = self
            .catalog
            .lookup(&query.track_id)
            .ok_or_else(|| ProgressError::unknown_track(query.track_id.as_str()))?;

        if self.learners.find(query.learner_id).await?.is_none() {
            return Err(ProgressError::learner_not_found(query.learner_id));
        }

        let progress = self
            .repository
            .find(query.learner_id, &definition.id)
            .await?
            .unwrap_or_else(|| {
                NavigationProgress::initial(query.learner_id, definition, Timestamp::now())
            });

        Ok(progress)
    }
}
