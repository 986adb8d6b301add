//! Checkpoint error types.

use crate::domain::foundation::{CheckpointId, DomainError, ErrorCode, LearnerId, ValidationError};

/// Errors raised by checkpoint operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    /// The learner does not exist.
    LearnerNotFound(LearnerId),
    /// No checkpoint with this id belongs to the learner.
    NotFound(CheckpointId),
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error. A failed restore leaves state untouched.
    Infrastructure(String),
}

impl CheckpointError {
    pub fn learner_not_found(id: LearnerId) -> Self {
        CheckpointError::LearnerNotFound(id)
    }
    pub fn not_found(id: CheckpointId) -> Self {
        CheckpointError::NotFound(id)
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CheckpointError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        CheckpointError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            CheckpointError::LearnerNotFound(_) => ErrorCode::LearnerNotFound,
            CheckpointError::NotFound(_) => ErrorCode::CheckpointNotFound,
            CheckpointError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CheckpointError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            CheckpointError::LearnerNotFound(id) => format!("Learner not found: {}", id),
            CheckpointError::NotFound(id) => format!("Checkpoint not found: {}", id),
            CheckpointError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            CheckpointError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for CheckpointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CheckpointError {}

impl From<ValidationError> for CheckpointError {
    fn from(err: ValidationError) -> Self {
        CheckpointError::validation(err.field(), err.to_string())
    }
}

impl From<DomainError> for CheckpointError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => CheckpointError::ValidationFailed {
                field: err.detail("field").unwrap_or("unknown").to_string(),
                message: err.message,
            },
            _ => CheckpointError::Infrastructure(err.to_string()),
        }
    }
}
