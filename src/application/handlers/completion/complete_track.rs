//! CompleteTrackHandler - Command handler for finishing a workshop track.
//!
//! Guards run in order: unknown track, unknown learner, already completed,
//! missing prerequisites. The completion record is written first-write-wins
//! and is never rolled back by a failing side effect.

use std::sync::Arc;

use crate::domain::completion::{
    ArtifactOutcome, CompletionError, CompletionRecord, CompletionResult,
};
use crate::domain::foundation::{LearnerId, Timestamp};
use crate::domain::progress::{NavigationProgress, ProgressChange};
use crate::domain::workshop::{WorkshopCatalog, WorkshopDefinition};
use crate::ports::{ArtifactGenerator, LearnerRepository, ProgressRepository};

/// Command to complete a track.
#[derive(Debug, Clone)]
pub struct CompleteTrackCommand {
    pub learner_id: LearnerId,
    pub track_id: String,
}

/// Handler for track completion.
pub struct CompleteTrackHandler {
    catalog: Arc<WorkshopCatalog>,
    learners: Arc<dyn LearnerRepository>,
    progress: Arc<dyn ProgressRepository>,
    artifacts: Arc<dyn ArtifactGenerator>,
}

impl CompleteTrackHandler {
    pub fn new(
        catalog: Arc<WorkshopCatalog>,
        learners: Arc<dyn LearnerRepository>,
        progress: Arc<dyn ProgressRepository>,
        artifacts: Arc<dyn ArtifactGenerator>,
    ) -> Self {
        Self {
            catalog,
            learners,
            progress,
            artifacts,
        }
    }

    pub async fn handle(&self, cmd: CompleteTrackCommand) -> Result<CompletionResult, CompletionError> {
        // 1. Track and learner must exist
        let definition = self
            .catalog
            .lookup(&cmd.track_id)
            .ok_or_else(|| CompletionError::unknown_track(cmd.track_id.as_str()))?;

        if self.learners.find(cmd.learner_id).await?.is_none() {
            return Err(CompletionError::learner_not_found(cmd.learner_id));
        }

        // 2. Completed is terminal
        if self
            .learners
            .find_completion(cmd.learner_id, &definition.id)
            .await?
            .is_some()
        {
            return Err(CompletionError::already_completed(definition.id.clone()));
        }

        // 3. Every required step must be done
        let now = Timestamp::now();
        let progress = self
            .progress
            .find(cmd.learner_id, &definition.id)
            .await?
            .unwrap_or_else(|| NavigationProgress::initial(cmd.learner_id, definition, now));

        let missing = definition.missing_steps(&progress.completed_steps);
        if !missing.is_empty() {
            return Err(CompletionError::missing_prerequisites(missing));
        }

        // 4. Record completion; losing a concurrent race is a conflict
        let record = CompletionRecord::new(cmd.learner_id, definition.id.clone(), now);
        if !self.learners.record_completion(&record).await? {
            return Err(CompletionError::already_completed(definition.id.clone()));
        }

        tracing::info!(
            learner_id = %cmd.learner_id,
            track = %definition.id,
            "Track completed"
        );

        // 5. Side effects; the unlock is applied to the current row, not the
        // copy read for the prerequisite check
        let downstream_unlocked = match &definition.unlock_marker {
            Some(marker) => {
                let change = ProgressChange::UnlockDownstream {
                    marker: Some(marker.clone()),
                };
                self.progress
                    .apply(NavigationProgress::initial(cmd.learner_id, definition, now), &change, now)
                    .await?;
                true
            }
            None => false,
        };

        let artifact = self.request_artifact(cmd.learner_id, definition).await;

        Ok(CompletionResult {
            track_id: definition.id.clone(),
            completed_at: now,
            downstream_unlocked,
            artifact,
        })
    }

    /// Requests and attaches the summary artifact. Failures degrade the
    /// result instead of failing the completion.
    async fn request_artifact(
        &self,
        learner_id: LearnerId,
        definition: &WorkshopDefinition,
    ) -> ArtifactOutcome {
        if !definition.generates_artifact {
            return ArtifactOutcome::NotRequested;
        }

        let reference = match self.artifacts.generate(learner_id, &definition.id).await {
            Ok(reference) => reference,
            Err(e) => {
                tracing::warn!(
                    learner_id = %learner_id,
                    track = %definition.id,
                    error = %e,
                    "Artifact generation failed"
                );
                return ArtifactOutcome::Failed(e.message);
            }
        };

        match self
            .learners
            .attach_artifact(learner_id, &definition.id, &reference)
            .await
        {
            Ok(()) => ArtifactOutcome::Generated(reference),
            Err(e) => {
                tracing::warn!(
                    learner_id = %learner_id,
                    track = %definition.id,
                    error = %e,
                    "Failed to store artifact reference"
                );
                ArtifactOutcome::Failed(e.message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::artifact::MockArtifactGenerator;
    use crate::adapters::memory::InMemoryWorkshopStore;
    use crate::domain::completion::ArtifactReference;
    use crate::domain::foundation::{DomainError, StepId, TrackId};
    use crate::domain::learner::Learner;
    use crate::domain::progress::{ProgressUpdate, VideoProgress};
    use async_trait::async_trait;

    /// Loses every completion race.
    struct RacingLearnerRepository {
        inner: InMemoryWorkshopStore,
    }

    #[async_trait]
    impl LearnerRepository for RacingLearnerRepository {
        async fn find(&self, learner_id: LearnerId) -> Result<Option<Learner>, DomainError> {
            LearnerRepository::find(&self.inner, learner_id).await
        }

        async fn list_completions(
            &self,
            learner_id: LearnerId,
        ) -> Result<Vec<CompletionRecord>, DomainError> {
            self.inner.list_completions(learner_id).await
        }

        async fn find_completion(
            &self,
            learner_id: LearnerId,
            track_id: &TrackId,
        ) -> Result<Option<CompletionRecord>, DomainError> {
            self.inner.find_completion(learner_id, track_id).await
        }

        async fn record_completion(&self, _record: &CompletionRecord) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn attach_artifact(
            &self,
            learner_id: LearnerId,
            track_id: &TrackId,
            artifact: &ArtifactReference,
        ) -> Result<(), DomainError> {
            self.inner.attach_artifact(learner_id, track_id, artifact).await
        }
    }

    /// Records the completion, but a progress merge lands between the
    /// prerequisite read and the unlock.
    struct InterleavingLearnerRepository {
        inner: Arc<InMemoryWorkshopStore>,
    }

    #[async_trait]
    impl LearnerRepository for InterleavingLearnerRepository {
        async fn find(&self, learner_id: LearnerId) -> Result<Option<Learner>, DomainError> {
            LearnerRepository::find(&*self.inner, learner_id).await
        }

        async fn list_completions(
            &self,
            learner_id: LearnerId,
        ) -> Result<Vec<CompletionRecord>, DomainError> {
            self.inner.list_completions(learner_id).await
        }

        async fn find_completion(
            &self,
            learner_id: LearnerId,
            track_id: &TrackId,
        ) -> Result<Option<CompletionRecord>, DomainError> {
            self.inner.find_completion(learner_id, track_id).await
        }

        async fn record_completion(&self, record: &CompletionRecord) -> Result<bool, DomainError> {
            let definition = WorkshopCatalog::builtin().get(&record.track_id).unwrap();
            let video = VideoProgress::try_from_map([("5-1".to_string(), 95.0)].into_iter().collect())
                .unwrap();
            let change = ProgressChange::Merge(ProgressUpdate {
                video_progress: Some(video),
                ..Default::default()
            });
            self.inner
                .apply(
                    NavigationProgress::initial(record.learner_id, definition, Timestamp::now()),
                    &change,
                    Timestamp::now(),
                )
                .await?;
            self.inner.record_completion(record).await
        }

        async fn attach_artifact(
            &self,
            learner_id: LearnerId,
            track_id: &TrackId,
            artifact: &ArtifactReference,
        ) -> Result<(), DomainError> {
            self.inner.attach_artifact(learner_id, track_id, artifact).await
        }
    }

    fn learner() -> LearnerId {
        LearnerId::new(42).unwrap()
    }

    fn track(id: &str) -> TrackId {
        TrackId::new(id).unwrap()
    }

    fn catalog() -> Arc<WorkshopCatalog> {
        Arc::new(WorkshopCatalog::builtin().clone())
    }

    async fn store_with_completed(track_id: &str, steps: Vec<StepId>) -> Arc<InMemoryWorkshopStore> {
        let store = Arc::new(InMemoryWorkshopStore::new());
        store.insert_learner(Learner::new(learner(), false)).await;
        let definition = WorkshopCatalog::builtin().get(&track(track_id)).unwrap();
        let mut progress = NavigationProgress::initial(learner(), definition, Timestamp::now());
        progress.completed_steps = steps;
        store.insert_progress(progress).await;
        store
    }

    fn all_required(track_id: &str) -> Vec<StepId> {
        WorkshopCatalog::builtin()
            .get(&track(track_id))
            .unwrap()
            .required_steps
            .clone()
    }

    fn handler(
        store: Arc<InMemoryWorkshopStore>,
        artifacts: Arc<MockArtifactGenerator>,
    ) -> CompleteTrackHandler {
        CompleteTrackHandler::new(catalog(), store.clone(), store, artifacts)
    }

    fn cmd(track_id: &str) -> CompleteTrackCommand {
        CompleteTrackCommand {
            learner_id: learner(),
            track_id: track_id.to_string(),
        }
    }

    #[tokio::test]
    async fn completes_primary_track_with_side_effects() {
        let store = store_with_completed("ast", all_required("ast")).await;
        let artifacts = Arc::new(MockArtifactGenerator::new());

        let result = handler(store.clone(), artifacts.clone())
            .handle(cmd("ast"))
            .await
            .unwrap();

        assert!(result.downstream_unlocked);
        assert!(result.artifact_generated());
        assert_eq!(artifacts.calls(), vec![(learner(), track("ast"))]);

        let progress = ProgressRepository::find(&*store, learner(), &track("ast"))
            .await
            .unwrap()
            .unwrap();
        assert!(progress.downstream_content_unlocked);
        assert_eq!(
            progress.completed_steps.iter().filter(|s| s.as_str() == "5-2").count(),
            1
        );

        let record = store.find_completion(learner(), &track("ast")).await.unwrap().unwrap();
        assert_eq!(record.artifact, result.artifact_reference().cloned());
    }

    #[tokio::test]
    async fn missing_steps_are_reported_in_definition_order() {
        let mut done = all_required("ast");
        let last = done.pop().unwrap();
        let second = done.remove(1);
        let store = store_with_completed("ast", done).await;

        let result = handler(store, Arc::new(MockArtifactGenerator::new()))
            .handle(cmd("ast"))
            .await;

        assert_eq!(
            result.unwrap_err(),
            CompletionError::missing_prerequisites(vec![second, last])
        );
    }

    #[tokio::test]
    async fn learner_without_progress_is_missing_every_step() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        store.insert_learner(Learner::new(learner(), false)).await;

        let err = handler(store, Arc::new(MockArtifactGenerator::new()))
            .handle(cmd("ia"))
            .await
            .unwrap_err();

        assert_eq!(err.missing_steps().unwrap(), all_required("ia").as_slice());
    }

    #[tokio::test]
    async fn second_completion_is_a_conflict() {
        let store = store_with_completed("ia", all_required("ia")).await;
        let handler = handler(store, Arc::new(MockArtifactGenerator::new()));

        handler.handle(cmd("ia")).await.unwrap();
        let result = handler.handle(cmd("ia")).await;

        assert_eq!(result.unwrap_err(), CompletionError::already_completed(track("ia")));
    }

    #[tokio::test]
    async fn losing_the_record_race_is_a_conflict() {
        let store = store_with_completed("ia", all_required("ia")).await;
        let handler = CompleteTrackHandler::new(
            catalog(),
            Arc::new(RacingLearnerRepository {
                inner: (*store).clone(),
            }),
            store,
            Arc::new(MockArtifactGenerator::new()),
        );

        let result = handler.handle(cmd("ia")).await;

        assert!(matches!(result, Err(CompletionError::AlreadyCompleted(_))));
    }

    #[tokio::test]
    async fn artifact_failure_is_degraded_success() {
        let store = store_with_completed("ast", all_required("ast")).await;
        let artifacts = Arc::new(MockArtifactGenerator::failing("renderer offline"));

        let result = handler(store.clone(), artifacts)
            .handle(cmd("ast"))
            .await
            .unwrap();

        assert!(result.is_degraded());
        assert_eq!(result.artifact_error(), Some("renderer offline"));
        assert!(result.downstream_unlocked);
        let record = store.find_completion(learner(), &track("ast")).await.unwrap();
        assert!(record.is_some());
        assert!(record.unwrap().artifact.is_none());
    }

    #[tokio::test]
    async fn track_without_effects_skips_them() {
        let store = store_with_completed("ia", all_required("ia")).await;
        let artifacts = Arc::new(MockArtifactGenerator::new());

        let result = handler(store, artifacts.clone())
            .handle(cmd("ia"))
            .await
            .unwrap();

        assert!(!result.downstream_unlocked);
        assert_eq!(result.artifact, ArtifactOutcome::NotRequested);
        assert!(artifacts.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_learner_is_not_found() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        let result = handler(store, Arc::new(MockArtifactGenerator::new()))
            .handle(cmd("ast"))
            .await;
        assert_eq!(result.unwrap_err(), CompletionError::learner_not_found(learner()));
    }

    #[tokio::test]
    async fn unknown_track_is_rejected_first() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        let result = handler(store, Arc::new(MockArtifactGenerator::new()))
            .handle(cmd("zz"))
            .await;
        assert_eq!(result.unwrap_err(), CompletionError::unknown_track("zz"));
    }

    #[tokio::test]
    async fn unlock_keeps_progress_merged_during_completion() {
        let store = store_with_completed("ast", all_required("ast")).await;
        let handler = CompleteTrackHandler::new(
            catalog(),
            Arc::new(InterleavingLearnerRepository {
                inner: store.clone(),
            }),
            store.clone(),
            Arc::new(MockArtifactGenerator::new()),
        );

        handler.handle(cmd("ast")).await.unwrap();

        let progress = ProgressRepository::find(&*store, learner(), &track("ast"))
            .await
            .unwrap()
            .unwrap();
        assert!(progress.downstream_content_unlocked);
        assert_eq!(progress.video_progress.get("5-1"), Some(95.0));
    }
}
