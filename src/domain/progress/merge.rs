//! Merge engine: reconciles a partial client update with the stored record.
//!
//! Every field except `video_progress` is last-write-wins at row
//! granularity. Two tabs writing `current_step_id` concurrently can clobber
//! each other; only watch progress is protected, by taking the maximum.

use std::collections::HashSet;

use super::{NavigationProgress, ProgressUpdate};
use crate::domain::foundation::{StepId, Timestamp};

/// Removes repeated steps, keeping the first occurrence.
pub fn dedupe_steps(steps: Vec<StepId>) -> Vec<StepId> {
    let mut seen = HashSet::with_capacity(steps.len());
    steps
        .into_iter()
        .filter(|step| seen.insert(step.clone()))
        .collect()
}

/// Applies `update` to `stored` and returns the merged record.
pub fn merge_progress(
    mut stored: NavigationProgress,
    update: &ProgressUpdate,
    now: Timestamp,
) -> NavigationProgress {
    if let Some(current) = &update.current_step_id {
        stored.current_step_id = current.clone();
    }
    if let Some(completed) = &update.completed_steps {
        stored.completed_steps = dedupe_steps(completed.clone());
    }
    if let Some(unlocked) = &update.unlocked_steps {
        stored.unlocked_steps = dedupe_steps(unlocked.clone());
    }
    if let Some(video) = &update.video_progress {
        stored.video_progress.merge_max(video);
    }
    stored.last_visited_at = now;
    stored
}

/// A change applied to the stored record while the repository holds it
/// exclusively, so concurrent writers always see each other's result.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressChange {
    /// A client update, merged by [`merge_progress`].
    Merge(ProgressUpdate),
    /// Completion side effect: append the marker and flag downstream content.
    UnlockDownstream { marker: Option<StepId> },
}

impl ProgressChange {
    /// Applies the change to `stored`.
    pub fn apply(&self, stored: NavigationProgress, now: Timestamp) -> NavigationProgress {
        match self {
            ProgressChange::Merge(update) => merge_progress(stored, update, now),
            ProgressChange::UnlockDownstream { marker } => {
                let mut progress = stored;
                progress.unlock_downstream(marker.as_ref());
                progress.last_visited_at = now;
                progress
            }
        }
    }
}
