//! Step data error types.

use crate::domain::foundation::{DomainError, ErrorCode, LearnerId, TrackId, ValidationError};

use super::StepKey;

/// Errors raised by step data operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepDataError {
    /// No live record for the key.
    NotFound(StepKey),
    /// The learner does not exist.
    LearnerNotFound(LearnerId),
    /// The track is not in the catalog.
    UnknownTrack(String),
    /// The track was completed and no longer accepts writes.
    Locked(TrackId),
    /// The caller's expected version does not match the stored one.
    VersionConflict { expected: i32, actual: Option<i32> },
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl StepDataError {
    pub fn not_found(key: StepKey) -> Self {
        StepDataError::NotFound(key)
    }
    pub fn learner_not_found(id: LearnerId) -> Self {
        StepDataError::LearnerNotFound(id)
    }
    pub fn locked(track: TrackId) -> Self {
        StepDataError::Locked(track)
    }
    pub fn version_conflict(expected: i32, actual: Option<i32>) -> Self {
        StepDataError::VersionConflict { expected, actual }
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        StepDataError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        StepDataError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            StepDataError::NotFound(_) => ErrorCode::StepNotFound,
            StepDataError::LearnerNotFound(_) => ErrorCode::LearnerNotFound,
            StepDataError::UnknownTrack(_) => ErrorCode::UnknownTrack,
            StepDataError::Locked(_) => ErrorCode::WorkshopLocked,
            StepDataError::VersionConflict { .. } => ErrorCode::VersionConflict,
            StepDataError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            StepDataError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            StepDataError::NotFound(key) => format!("Step data not found: {}", key),
            StepDataError::LearnerNotFound(id) => format!("Learner not found: {}", id),
            StepDataError::UnknownTrack(track) => format!("Unknown track: {}", track),
            StepDataError::Locked(track) => {
                format!("Workshop '{}' is completed and locked for editing", track)
            }
            StepDataError::VersionConflict { expected, actual } => match actual {
                Some(actual) => format!(
                    "Version conflict: expected {}, stored version is {}",
                    expected, actual
                ),
                None => format!("Version conflict: expected {}, no stored version", expected),
            },
            StepDataError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            StepDataError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for StepDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for StepDataError {}

impl From<ValidationError> for StepDataError {
    fn from(err: ValidationError) -> Self {
        StepDataError::validation(err.field(), err.to_string())
    }
}

impl From<DomainError> for StepDataError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::VersionConflict => StepDataError::VersionConflict {
                expected: err
                    .detail("expected")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_default(),
                actual: err.detail("actual").and_then(|v| v.parse().ok()),
            },
            ErrorCode::ValidationFailed => StepDataError::ValidationFailed {
                field: err.detail("field").unwrap_or("unknown").to_string(),
                message: err.message,
            },
            ErrorCode::UnknownTrack => StepDataError::UnknownTrack(err.message),
            _ => StepDataError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_conflict_details_survive_conversion() {
        let err = DomainError::new(ErrorCode::VersionConflict, "stale")
            .with_detail("expected", "2")
            .with_detail("actual", "3");

        assert_eq!(
            StepDataError::from(err),
            StepDataError::version_conflict(2, Some(3))
        );
    }

    #[test]
    fn missing_actual_version_means_absent_row() {
        let err = DomainError::new(ErrorCode::VersionConflict, "stale").with_detail("expected", "4");
        assert_eq!(StepDataError::from(err), StepDataError::version_conflict(4, None));
    }

    #[test]
    fn locked_maps_to_workshop_locked_code() {
        let err = StepDataError::locked(TrackId::new("ast").unwrap());
        assert_eq!(err.code(), ErrorCode::WorkshopLocked);
        assert!(err.message().contains("locked"));
    }
}
