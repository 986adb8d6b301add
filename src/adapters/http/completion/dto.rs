//! Response DTOs for completion endpoints.

use serde::Serialize;

use crate::domain::completion::{CompletionResult, TrackCompletionStatus};

/// Body returned by `POST /api/completion/:track`.
///
/// A failed artifact still returns `completed: true`, with
/// `artifactGenerated: false` and the reason in `artifactError`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub track_id: String,
    pub completed: bool,
    pub completed_at: String,
    pub downstream_unlocked: bool,
    pub artifact_generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_error: Option<String>,
}

impl From<CompletionResult> for CompletionResponse {
    fn from(result: CompletionResult) -> Self {
        Self {
            track_id: result.track_id.to_string(),
            completed: true,
            completed_at: result.completed_at.to_rfc3339(),
            downstream_unlocked: result.downstream_unlocked,
            artifact_generated: result.artifact_generated(),
            artifact_reference: result.artifact_reference().map(|r| r.to_string()),
            artifact_error: result.artifact_error().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackStatusResponse {
    pub track_id: String,
    pub name: String,
    pub completed: bool,
    pub completed_at: Option<String>,
}

impl From<TrackCompletionStatus> for TrackStatusResponse {
    fn from(status: TrackCompletionStatus) -> Self {
        Self {
            completed: status.completed(),
            track_id: status.track_id.to_string(),
            name: status.name,
            completed_at: status.completed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Body returned by `GET /api/completion`.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionStatusResponse {
    pub tracks: Vec<TrackStatusResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::completion::ArtifactOutcome;
    use crate::domain::foundation::{Timestamp, TrackId};

    #[test]
    fn degraded_result_serializes_artifact_error() {
        let response: CompletionResponse = CompletionResult {
            track_id: TrackId::new("ast").unwrap(),
            completed_at: Timestamp::now(),
            downstream_unlocked: true,
            artifact: ArtifactOutcome::Failed("timeout".to_string()),
        }
        .into();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["completed"], true);
        assert_eq!(json["artifactGenerated"], false);
        assert_eq!(json["artifactError"], "timeout");
        assert!(json.get("artifactReference").is_none());
    }
}
