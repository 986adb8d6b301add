//! Progress-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, LearnerId, ValidationError};

/// Errors raised by progress operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressError {
    /// The track is not in the catalog.
    UnknownTrack(String),
    /// The learner does not exist.
    LearnerNotFound(LearnerId),
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl ProgressError {
    pub fn unknown_track(track: impl Into<String>) -> Self {
        ProgressError::UnknownTrack(track.into())
    }
    pub fn learner_not_found(learner_id: LearnerId) -> Self {
        ProgressError::LearnerNotFound(learner_id)
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ProgressError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        ProgressError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            ProgressError::UnknownTrack(_) => ErrorCode::UnknownTrack,
            ProgressError::LearnerNotFound(_) => ErrorCode::LearnerNotFound,
            ProgressError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ProgressError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            ProgressError::UnknownTrack(track) => format!("Unknown track: {}", track),
            ProgressError::LearnerNotFound(id) => format!("Learner not found: {}", id),
            ProgressError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ProgressError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for ProgressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ProgressError {}

impl From<ValidationError> for ProgressError {
    fn from(err: ValidationError) -> Self {
        ProgressError::validation(err.field(), err.to_string())
    }
}

impl From<DomainError> for ProgressError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => ProgressError::ValidationFailed {
                field: err.detail("field").unwrap_or("unknown").to_string(),
                message: err.message,
            },
            ErrorCode::UnknownTrack => ProgressError::UnknownTrack(err.message),
            _ => ProgressError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_become_infrastructure() {
        let err: ProgressError = DomainError::database("connection reset").into();
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn unknown_learner_maps_to_not_found_code() {
        let err = ProgressError::learner_not_found(LearnerId::new(9).unwrap());
        assert_eq!(err.code(), ErrorCode::LearnerNotFound);
        assert_eq!(err.message(), "Learner not found: 9");
    }

    #[test]
    fn validation_errors_keep_field() {
        let err: ProgressError = ValidationError::out_of_range("video_progress.2-1", 0, 100, 140).into();
        assert!(matches!(err, ProgressError::ValidationFailed { ref field, .. } if field == "video_progress.2-1"));
    }
}
