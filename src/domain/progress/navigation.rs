//! Navigation progress record and the partial updates clients submit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{LearnerId, StepId, Timestamp, TrackId, ValidationError};
use crate::domain::workshop::WorkshopDefinition;

/// Watched percentage per step or video segment.
///
/// Values are in `0.0..=100.0`. Merging keeps the larger value per key, so a
/// stale tab submitting an older position never rewinds progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoProgress(BTreeMap<String, f64>);

impl VideoProgress {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a validated map from raw client values.
    pub fn try_from_map(values: BTreeMap<String, f64>) -> Result<Self, ValidationError> {
        for (key, value) in &values {
            if key.trim().is_empty() {
                return Err(ValidationError::empty_field("video_progress key"));
            }
            if !value.is_finite() || *value < 0.0 || *value > 100.0 {
                return Err(ValidationError::out_of_range(
                    format!("video_progress.{}", key),
                    0,
                    100,
                    if value.is_finite() { *value as i32 } else { i32::MAX },
                ));
            }
        }
        Ok(Self(values))
    }

    /// Returns the watched percentage for a key.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing has been watched.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Merges `incoming` into `self`, keeping the maximum per key.
    pub fn merge_max(&mut self, incoming: &VideoProgress) {
        for (key, value) in &incoming.0 {
            self.0
                .entry(key.clone())
                .and_modify(|stored| *stored = stored.max(*value))
                .or_insert(*value);
        }
    }
}

/// A learner's navigation state within one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationProgress {
    pub learner_id: LearnerId,
    pub track_id: TrackId,
    pub completed_steps: Vec<StepId>,
    pub current_step_id: StepId,
    pub unlocked_steps: Vec<StepId>,
    pub video_progress: VideoProgress,
    #[serde(default)]
    pub downstream_content_unlocked: bool,
    pub last_visited_at: Timestamp,
}

impl NavigationProgress {
    /// The default record for a learner who has not started the track.
    pub fn initial(learner_id: LearnerId, definition: &WorkshopDefinition, now: Timestamp) -> Self {
        Self {
            learner_id,
            track_id: definition.id.clone(),
            completed_steps: Vec::new(),
            current_step_id: definition.first_step.clone(),
            unlocked_steps: Vec::new(),
            video_progress: VideoProgress::new(),
            downstream_content_unlocked: false,
            last_visited_at: now,
        }
    }

    /// Returns true if the step is in `completed_steps`.
    pub fn has_completed(&self, step: &StepId) -> bool {
        self.completed_steps.contains(step)
    }

    /// Appends a step to `completed_steps` unless already present.
    ///
    /// Returns true if the step was added.
    pub fn mark_completed(&mut self, step: StepId) -> bool {
        if self.has_completed(&step) {
            return false;
        }
        self.completed_steps.push(step);
        true
    }

    /// Applies the completion side effect: append the unlock marker and
    /// flag downstream content as available.
    pub fn unlock_downstream(&mut self, marker: Option<&StepId>) {
        if let Some(marker) = marker {
            self.mark_completed(marker.clone());
        }
        self.downstream_content_unlocked = true;
    }
}

/// Partial progress submitted by a client. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressUpdate {
    pub current_step_id: Option<StepId>,
    pub completed_steps: Option<Vec<StepId>>,
    pub unlocked_steps: Option<Vec<StepId>>,
    pub video_progress: Option<VideoProgress>,
}

impl ProgressUpdate {
    /// Every step-like identifier in the update, used for track inference.
    pub fn step_hints(&self) -> Vec<&str> {
        let mut hints = Vec::new();
        if let Some(step) = &self.current_step_id {
            hints.push(step.as_str());
        }
        for list in [&self.completed_steps, &self.unlocked_steps].into_iter().flatten() {
            hints.extend(list.iter().map(StepId::as_str));
        }
        if let Some(video) = &self.video_progress {
            hints.extend(video.keys());
        }
        hints
    }

    /// Returns true if the update carries no fields.
    pub fn is_empty(&self) -> bool {
        self.current_step_id.is_none()
            && self.completed_steps.is_none()
            && self.unlocked_steps.is_none()
            && self.video_progress.is_none()
    }
}
