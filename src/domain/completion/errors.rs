//! Completion error types.

use crate::domain::foundation::{DomainError, ErrorCode, LearnerId, StepId, TrackId};

/// Errors raised by completion operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The track is not in the catalog.
    UnknownTrack(String),
    /// The learner does not exist.
    LearnerNotFound(LearnerId),
    /// The track was already completed.
    AlreadyCompleted(TrackId),
    /// Required steps are missing, in curriculum order.
    MissingPrerequisites(Vec<StepId>),
    /// Infrastructure error.
    Infrastructure(String),
}

impl CompletionError {
    pub fn unknown_track(track: impl Into<String>) -> Self {
        CompletionError::UnknownTrack(track.into())
    }
    pub fn learner_not_found(id: LearnerId) -> Self {
        CompletionError::LearnerNotFound(id)
    }
    pub fn already_completed(track: TrackId) -> Self {
        CompletionError::AlreadyCompleted(track)
    }
    pub fn missing_prerequisites(missing: Vec<StepId>) -> Self {
        CompletionError::MissingPrerequisites(missing)
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        CompletionError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            CompletionError::UnknownTrack(_) => ErrorCode::UnknownTrack,
            CompletionError::LearnerNotFound(_) => ErrorCode::LearnerNotFound,
            CompletionError::AlreadyCompleted(_) => ErrorCode::AlreadyCompleted,
            CompletionError::MissingPrerequisites(_) => ErrorCode::MissingPrerequisites,
            CompletionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            CompletionError::UnknownTrack(track) => format!("Unknown track: {}", track),
            CompletionError::LearnerNotFound(id) => format!("Learner not found: {}", id),
            CompletionError::AlreadyCompleted(track) => {
                format!("Workshop '{}' is already completed", track)
            }
            CompletionError::MissingPrerequisites(missing) => format!(
                "Cannot complete workshop: {} required step(s) missing",
                missing.len()
            ),
            CompletionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Missing steps, when this is a prerequisite failure.
    pub fn missing_steps(&self) -> Option<&[StepId]> {
        match self {
            CompletionError::MissingPrerequisites(missing) => Some(missing),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompletionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CompletionError {}

impl From<DomainError> for CompletionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::UnknownTrack => CompletionError::UnknownTrack(err.message),
            _ => CompletionError::Infrastructure(err.to_string()),
        }
    }
}
