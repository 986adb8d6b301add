//! In-memory workshop store.
//!
//! Implements every storage port over one shared state behind a single
//! `tokio::sync::RwLock`. Capture and restore hold the write lock for the
//! whole operation, and restore works on a copy that is swapped in only
//! when every step succeeded.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::checkpoint::{Checkpoint, CheckpointData, CollaboratorRecord};
use crate::domain::completion::{ArtifactReference, CompletionRecord};
use crate::domain::foundation::{CheckpointId, DomainError, LearnerId, Timestamp, TrackId};
use crate::domain::learner::Learner;
use crate::domain::progress::{NavigationProgress, ProgressChange};
use crate::domain::step_data::{StepKey, StepRecord};
use crate::ports::{
    version_conflict, CheckpointRepository, LearnerRepository, ProgressRepository,
    StepDataRepository,
};

#[derive(Debug, Clone, Default)]
struct StoreState {
    learners: HashMap<LearnerId, Learner>,
    progress: HashMap<(LearnerId, TrackId), NavigationProgress>,
    steps: BTreeMap<StepKey, StepRecord>,
    completions: HashMap<(LearnerId, TrackId), CompletionRecord>,
    records: HashMap<LearnerId, Vec<CollaboratorRecord>>,
    checkpoints: HashMap<CheckpointId, Checkpoint>,
}

impl StoreState {
    fn clear_learner(&mut self, learner_id: LearnerId) {
        self.progress.retain(|(id, _), _| *id != learner_id);
        self.steps.retain(|key, _| key.learner_id != learner_id);
        self.completions.retain(|(id, _), _| *id != learner_id);
        self.records.remove(&learner_id);
    }
}

/// In-memory implementation of the storage ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkshopStore {
    state: Arc<RwLock<StoreState>>,
    fail_restore_after_clear: Arc<std::sync::atomic::AtomicBool>,
}

impl InMemoryWorkshopStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a learner.
    pub async fn insert_learner(&self, learner: Learner) {
        self.state.write().await.learners.insert(learner.id, learner);
    }

    /// Add a collaborator-owned record for a learner.
    pub async fn insert_collaborator_record(&self, learner_id: LearnerId, record: CollaboratorRecord) {
        self.state
            .write()
            .await
            .records
            .entry(learner_id)
            .or_default()
            .push(record);
    }

    /// Current collaborator records of a learner.
    pub async fn collaborator_records(&self, learner_id: LearnerId) -> Vec<CollaboratorRecord> {
        self.state
            .read()
            .await
            .records
            .get(&learner_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Overwrite a stored step row as-is (for seeding old tombstones).
    pub async fn insert_step_record(&self, record: StepRecord) {
        self.state
            .write()
            .await
            .steps
            .insert(record.key.clone(), record);
    }

    /// Total step rows, tombstones included.
    pub async fn step_row_count(&self) -> usize {
        self.state.read().await.steps.len()
    }

    /// Overwrite a progress row as-is (for seeding).
    pub async fn insert_progress(&self, progress: NavigationProgress) {
        self.state
            .write()
            .await
            .progress
            .insert((progress.learner_id, progress.track_id.clone()), progress);
    }

    /// Make the next restore fail after clearing the learner's rows.
    pub fn fail_next_restore(&self) {
        self.fail_restore_after_clear
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl ProgressRepository for InMemoryWorkshopStore {
    async fn find(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
    ) -> Result<Option<NavigationProgress>, DomainError> {
        let state = self.state.read().await;
        Ok(state.progress.get(&(learner_id, track_id.clone())).cloned())
    }

    async fn apply(
        &self,
        initial: NavigationProgress,
        change: &ProgressChange,
        now: Timestamp,
    ) -> Result<NavigationProgress, DomainError> {
        let mut state = self.state.write().await;
        let key = (initial.learner_id, initial.track_id.clone());
        let stored = state.progress.remove(&key).unwrap_or(initial);
        let updated = change.apply(stored, now);
        state.progress.insert(key, updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl StepDataRepository for InMemoryWorkshopStore {
    async fn upsert(
        &self,
        key: &StepKey,
        payload: &Value,
        expected_version: Option<i32>,
        now: Timestamp,
    ) -> Result<StepRecord, DomainError> {
        let mut state = self.state.write().await;
        match (state.steps.get_mut(key), expected_version) {
            (Some(existing), Some(expected)) if existing.version != expected => {
                Err(version_conflict(expected, Some(existing.version)))
            }
            (Some(existing), _) => {
                existing.overwrite(payload.clone(), now);
                Ok(existing.clone())
            }
            (None, Some(expected)) if expected != 0 => Err(version_conflict(expected, None)),
            (None, _) => {
                let record = StepRecord::new(key.clone(), payload.clone(), now);
                state.steps.insert(key.clone(), record.clone());
                Ok(record)
            }
        }
    }

    async fn find(&self, key: &StepKey) -> Result<Option<StepRecord>, DomainError> {
        Ok(self.state.read().await.steps.get(key).cloned())
    }

    async fn list_for_track(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
    ) -> Result<Vec<StepRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .steps
            .values()
            .filter(|r| r.key.learner_id == learner_id && &r.key.track_id == track_id)
            .filter(|r| !r.is_tombstoned())
            .cloned()
            .collect())
    }

    async fn list_for_learner(&self, learner_id: LearnerId) -> Result<Vec<StepRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .steps
            .values()
            .filter(|r| r.key.learner_id == learner_id)
            .cloned()
            .collect())
    }

    async fn hard_delete_for_learner(&self, learner_id: LearnerId) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let before = state.steps.len();
        state.steps.retain(|key, _| key.learner_id != learner_id);
        Ok((before - state.steps.len()) as u64)
    }

    async fn soft_delete_for_learner(
        &self,
        learner_id: LearnerId,
        at: Timestamp,
    ) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let mut affected = 0;
        for record in state
            .steps
            .values_mut()
            .filter(|r| r.key.learner_id == learner_id && !r.is_tombstoned())
        {
            record.tombstone(at);
            affected += 1;
        }
        Ok(affected)
    }

    async fn purge_tombstoned_before(&self, cutoff: Timestamp) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let before = state.steps.len();
        state.steps.retain(|_, record| !record.tombstoned_before(&cutoff));
        Ok((before - state.steps.len()) as u64)
    }
}

#[async_trait]
impl LearnerRepository for InMemoryWorkshopStore {
    async fn find(&self, learner_id: LearnerId) -> Result<Option<Learner>, DomainError> {
        Ok(self.state.read().await.learners.get(&learner_id).cloned())
    }

    async fn list_completions(
        &self,
        learner_id: LearnerId,
    ) -> Result<Vec<CompletionRecord>, DomainError> {
        let state = self.state.read().await;
        let mut records: Vec<CompletionRecord> = state
            .completions
            .values()
            .filter(|r| r.learner_id == learner_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.track_id.cmp(&b.track_id));
        Ok(records)
    }

    async fn find_completion(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
    ) -> Result<Option<CompletionRecord>, DomainError> {
        let state = self.state.read().await;
        Ok(state.completions.get(&(learner_id, track_id.clone())).cloned())
    }

    async fn record_completion(&self, record: &CompletionRecord) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let key = (record.learner_id, record.track_id.clone());
        if state.completions.contains_key(&key) {
            return Ok(false);
        }
        state.completions.insert(key, record.clone());
        Ok(true)
    }

    async fn attach_artifact(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
        artifact: &ArtifactReference,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        match state.completions.get_mut(&(learner_id, track_id.clone())) {
            Some(record) => {
                record.artifact = Some(artifact.clone());
                Ok(())
            }
            None => Err(DomainError::database(format!(
                "No completion record for learner {} track {}",
                learner_id, track_id
            ))),
        }
    }
}

#[async_trait]
impl CheckpointRepository for InMemoryWorkshopStore {
    async fn capture(&self, learner_id: LearnerId) -> Result<CheckpointData, DomainError> {
        let state = self.state.read().await;

        let mut navigation_progress: Vec<NavigationProgress> = state
            .progress
            .values()
            .filter(|p| p.learner_id == learner_id)
            .cloned()
            .collect();
        navigation_progress.sort_by(|a, b| a.track_id.cmp(&b.track_id));

        let mut completions: Vec<CompletionRecord> = state
            .completions
            .values()
            .filter(|c| c.learner_id == learner_id)
            .cloned()
            .collect();
        completions.sort_by(|a, b| a.track_id.cmp(&b.track_id));

        Ok(CheckpointData {
            navigation_progress,
            step_data: state
                .steps
                .values()
                .filter(|r| r.key.learner_id == learner_id)
                .cloned()
                .collect(),
            collaborator_records: state.records.get(&learner_id).cloned().unwrap_or_default(),
            completions,
            learner_progress: state
                .learners
                .get(&learner_id)
                .map(|l| l.progress)
                .unwrap_or_default(),
        })
    }

    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state.checkpoints.insert(checkpoint.id, checkpoint.clone());
        Ok(())
    }

    async fn list_for_learner(&self, learner_id: LearnerId) -> Result<Vec<Checkpoint>, DomainError> {
        let state = self.state.read().await;
        let mut checkpoints: Vec<Checkpoint> = state
            .checkpoints
            .values()
            .filter(|c| c.belongs_to(learner_id))
            .cloned()
            .collect();
        checkpoints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(checkpoints)
    }

    async fn find(&self, id: &CheckpointId) -> Result<Option<Checkpoint>, DomainError> {
        Ok(self.state.read().await.checkpoints.get(id).cloned())
    }

    async fn delete(&self, learner_id: LearnerId, id: &CheckpointId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        match state.checkpoints.get(id) {
            Some(checkpoint) if checkpoint.belongs_to(learner_id) => {
                state.checkpoints.remove(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn restore(&self, learner_id: LearnerId, data: &CheckpointData) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let mut staged = state.clone();

        staged.clear_learner(learner_id);
        if self
            .fail_restore_after_clear
            .swap(false, std::sync::atomic::Ordering::SeqCst)
        {
            return Err(DomainError::database("Simulated failure during restore"));
        }

        for progress in &data.navigation_progress {
            staged
                .progress
                .insert((learner_id, progress.track_id.clone()), progress.clone());
        }
        for record in &data.step_data {
            staged.steps.insert(record.key.clone(), record.clone());
        }
        for completion in &data.completions {
            staged
                .completions
                .insert((learner_id, completion.track_id.clone()), completion.clone());
        }
        if !data.collaborator_records.is_empty() {
            staged
                .records
                .insert(learner_id, data.collaborator_records.clone());
        }
        if let Some(learner) = staged.learners.get_mut(&learner_id) {
            learner.progress = data.learner_progress;
        }

        *state = staged;
        Ok(())
    }
}
