//! Error responses shared by every HTTP area.
//!
//! Each area maps its error enum onto an `ErrorCode`; this module turns the
//! code into a status and a JSON body. Persistence failures are logged and
//! reported with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ErrorCode;

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalError, "An internal error occurred")
    }
}

/// HTTP status for an error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed | ErrorCode::UnknownTrack => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::WorkshopLocked => StatusCode::FORBIDDEN,
        ErrorCode::LearnerNotFound | ErrorCode::StepNotFound | ErrorCode::CheckpointNotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorCode::AlreadyCompleted | ErrorCode::VersionConflict => StatusCode::CONFLICT,
        ErrorCode::MissingPrerequisites => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::ArtifactGenerationFailed => StatusCode::BAD_GATEWAY,
        ErrorCode::DatabaseError | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Builds the response for a failed operation.
pub fn error_response(code: ErrorCode, message: String, details: Option<serde_json::Value>) -> Response {
    let status = status_for(code);
    if status.is_server_error() {
        tracing::error!(code = %code, error = %message, "Request failed");
        return (status, Json(ErrorResponse::internal())).into_response();
    }

    let mut body = ErrorResponse::new(code, message);
    body.details = details;
    (status, Json(body)).into_response()
}

/// 400 response for malformed path or body input.
pub fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_error_kinds() {
        assert_eq!(status_for(ErrorCode::ValidationFailed), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorCode::WorkshopLocked), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorCode::StepNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::VersionConflict), StatusCode::CONFLICT);
        assert_eq!(
            status_for(ErrorCode::MissingPrerequisites),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(ErrorCode::DatabaseError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_errors_hide_the_message() {
        let response = error_response(
            ErrorCode::DatabaseError,
            "password authentication failed for user".to_string(),
            None,
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_response_omits_empty_details() {
        let json = serde_json::to_value(ErrorResponse::bad_request("Invalid input")).unwrap();
        assert_eq!(json["code"], "VALIDATION_FAILED");
        assert!(json.get("details").is_none());
    }
}
