//! MergeProgressHandler - Command handler for syncing client progress.

use std::sync::Arc;

use crate::domain::foundation::{LearnerId, Timestamp};
use crate::domain::progress::{NavigationProgress, ProgressChange, ProgressError, ProgressUpdate};
use crate::domain::workshop::WorkshopCatalog;
use crate::ports::{LearnerRepository, ProgressRepository};

/// Command to merge a partial progress update.
#[derive(Debug, Clone)]
pub struct MergeProgressCommand {
    pub learner_id: LearnerId,
    /// Explicit track; inferred from the update's step ids when absent.
    pub track_id: Option<String>,
    pub update: ProgressUpdate,
}

/// Handler for merging progress updates.
pub struct MergeProgressHandler {
    catalog: Arc<WorkshopCatalog>,
    learners: Arc<dyn LearnerRepository>,
    repository: Arc<dyn ProgressRepository>,
}

impl MergeProgressHandler {
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

    pub async fn handle(&self, cmd: MergeProgressCommand) -> Result<NavigationProgress, ProgressError> {
        // 1. Resolve the track
        let definition = match &cmd.track_id {
            Some(raw) => self
                .catalog
                .lookup(raw)
                .ok_or_else(|| ProgressError::unknown_track(raw.as_str()))?,
            None => self.catalog.infer_track(cmd.update.step_hints()),
        };

        // 2. Learner must exist
        if self.learners.find(cmd.learner_id).await?.is_none() {
            return Err(ProgressError::learner_not_found(cmd.learner_id));
        }

        // 3. Merge against the locked row, starting from the track default
        let now = Timestamp::now();
        let initial = NavigationProgress::initial(cmd.learner_id, definition, now);
        let merged = self
            .repository
            .apply(initial, &ProgressChange::Merge(cmd.update), now)
            .await?;

        tracing::debug!(
            learner_id = %cmd.learner_id,
            track = %definition.id,
            "Merged navigation progress"
        );

        Ok(merged)
    }
}
