//! Track completion lifecycle and the records it produces.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    LearnerId, StateMachine, Timestamp, TrackId, ValidationError,
};

/// Completion status of one (learner, track) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    #[default]
    InProgress,
    Completed,
}

impl TrackStatus {
    /// Status implied by an optional completion record.
    pub fn from_record(record: Option<&CompletionRecord>) -> Self {
        if record.is_some() {
            TrackStatus::Completed
        } else {
            TrackStatus::InProgress
        }
    }

    /// Step writes are only accepted while in progress.
    pub fn accepts_step_writes(&self) -> bool {
        matches!(self, TrackStatus::InProgress)
    }
}

impl StateMachine for TrackStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (TrackStatus::InProgress, TrackStatus::Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            TrackStatus::InProgress => vec![TrackStatus::Completed],
            TrackStatus::Completed => vec![],
        }
    }
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrackStatus::InProgress => "InProgress",
            TrackStatus::Completed => "Completed",
        };
        write!(f, "{}", s)
    }
}

/// Reference to a generated summary artifact (URL or storage key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactReference(String);

impl ArtifactReference {
    pub fn new(reference: impl Into<String>) -> Result<Self, ValidationError> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(ValidationError::empty_field("artifact_reference"));
        }
        Ok(Self(reference))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Durable record that a learner completed a track. Written once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub learner_id: LearnerId,
    pub track_id: TrackId,
    pub completed_at: Timestamp,
    pub artifact: Option<ArtifactReference>,
}

impl CompletionRecord {
    pub fn new(learner_id: LearnerId, track_id: TrackId, completed_at: Timestamp) -> Self {
        Self {
            learner_id,
            track_id,
            completed_at,
            artifact: None,
        }
    }
}

/// What happened to the artifact side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// The track does not generate an artifact.
    NotRequested,
    Generated(ArtifactReference),
    /// Generation failed; the completion still stands.
    Failed(String),
}

/// Result of a successful `complete_track`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    pub track_id: TrackId,
    pub completed_at: Timestamp,
    pub downstream_unlocked: bool,
    pub artifact: ArtifactOutcome,
}

impl CompletionResult {
    pub fn artifact_generated(&self) -> bool {
        matches!(self.artifact, ArtifactOutcome::Generated(_))
    }

    /// True when completion succeeded but the artifact could not be produced.
    pub fn is_degraded(&self) -> bool {
        matches!(self.artifact, ArtifactOutcome::Failed(_))
    }

    pub fn artifact_error(&self) -> Option<&str> {
        match &self.artifact {
            ArtifactOutcome::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn artifact_reference(&self) -> Option<&ArtifactReference> {
        match &self.artifact {
            ArtifactOutcome::Generated(reference) => Some(reference),
            _ => None,
        }
    }
}

/// Per-track completion summary for a learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackCompletionStatus {
    pub track_id: TrackId,
    pub name: String,
    pub status: TrackStatus,
    pub completed_at: Option<Timestamp>,
}

impl TrackCompletionStatus {
    pub fn completed(&self) -> bool {
        self.status == TrackStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(artifact: ArtifactOutcome) -> CompletionResult {
        CompletionResult {
            track_id: TrackId::new("ast").unwrap(),
            completed_at: Timestamp::now(),
            downstream_unlocked: true,
            artifact,
        }
    }

    #[test]
    fn completed_is_terminal() {
        assert!(TrackStatus::InProgress.can_transition_to(&TrackStatus::Completed));
        assert!(TrackStatus::Completed.is_terminal());
        assert!(TrackStatus::Completed
            .transition_to(TrackStatus::Completed)
            .is_err());
    }

    #[test]
    fn status_from_record() {
        let record = CompletionRecord::new(
            LearnerId::new(1).unwrap(),
            TrackId::new("ia").unwrap(),
            Timestamp::now(),
        );
        assert_eq!(TrackStatus::from_record(Some(&record)), TrackStatus::Completed);
        assert_eq!(TrackStatus::from_record(None), TrackStatus::InProgress);
        assert!(!TrackStatus::Completed.accepts_step_writes());
    }

    #[test]
    fn degraded_result_reports_failure() {
        let degraded = result(ArtifactOutcome::Failed("timeout".to_string()));
        assert!(degraded.is_degraded());
        assert!(!degraded.artifact_generated());
        assert_eq!(degraded.artifact_error(), Some("timeout"));
    }

    #[test]
    fn generated_result_exposes_reference() {
        let reference = ArtifactReference::new("cards/5/ast.png").unwrap();
        let ok = result(ArtifactOutcome::Generated(reference.clone()));
        assert!(ok.artifact_generated());
        assert!(!ok.is_degraded());
        assert_eq!(ok.artifact_reference(), Some(&reference));
    }

    #[test]
    fn artifact_reference_rejects_blank() {
        assert!(ArtifactReference::new("  ").is_err());
    }
}
