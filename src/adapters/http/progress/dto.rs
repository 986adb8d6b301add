//! Request DTOs for progress endpoints. Responses serialize
//! `NavigationProgress` directly.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::domain::foundation::{StepId, ValidationError};
use crate::domain::progress::{ProgressUpdate, VideoProgress};

/// Body of `POST /api/progress`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeProgressRequest {
    pub track_id: Option<String>,
    pub current_step_id: Option<String>,
    pub completed_steps: Option<Vec<String>>,
    pub unlocked_steps: Option<Vec<String>>,
    pub video_progress: Option<BTreeMap<String, f64>>,
}

fn parse_steps(raw: Option<Vec<String>>) -> Result<Option<Vec<StepId>>, ValidationError> {
    raw.map(|steps| steps.into_iter().map(StepId::new).collect())
        .transpose()
}

impl MergeProgressRequest {
    /// Splits the body into the explicit track and a validated update.
    pub fn into_update(self) -> Result<(Option<String>, ProgressUpdate), ValidationError> {
        let update = ProgressUpdate {
            current_step_id: self.current_step_id.map(StepId::new).transpose()?,
            completed_steps: parse_steps(self.completed_steps)?,
            unlocked_steps: parse_steps(self.unlocked_steps)?,
            video_progress: self
                .video_progress
                .map(VideoProgress::try_from_map)
                .transpose()?,
        };
        Ok((self.track_id, update))
    }
}
