//! DTOs for operator endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::checkpoint::Checkpoint;

/// Body of `POST /api/admin/learners/:learner/checkpoints`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckpointRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Checkpoint metadata without the captured rows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointSummaryResponse {
    pub id: String,
    pub learner_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub track_count: usize,
    pub step_count: usize,
    pub record_count: usize,
}

impl From<&Checkpoint> for CheckpointSummaryResponse {
    fn from(checkpoint: &Checkpoint) -> Self {
        Self {
            id: checkpoint.id.to_string(),
            learner_id: checkpoint.learner_id.value(),
            name: checkpoint.name.clone(),
            description: checkpoint.description.clone(),
            created_at: checkpoint.created_at.to_rfc3339(),
            track_count: checkpoint.data.navigation_progress.len(),
            step_count: checkpoint.data.step_data.len(),
            record_count: checkpoint.data.collaborator_records.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckpointListResponse {
    pub checkpoints: Vec<CheckpointSummaryResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreCheckpointResponse {
    pub checkpoint_id: String,
    pub restored: bool,
    pub message: String,
}

/// Optional body of `POST /api/admin/maintenance/reclaim`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReclaimRequest {
    #[serde(default)]
    pub retention_months: Option<u32>,
}
