//! HTTP handlers for completion endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::error_response;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::completion::{
    CompleteTrackCommand, CompleteTrackHandler, GetCompletionStatusHandler,
    GetCompletionStatusQuery,
};
use crate::domain::completion::CompletionError;

use super::dto::{CompletionResponse, CompletionStatusResponse};

#[derive(Clone)]
pub struct CompletionHandlers {
    complete_handler: Arc<CompleteTrackHandler>,
    status_handler: Arc<GetCompletionStatusHandler>,
}

impl CompletionHandlers {
    pub fn new(
        complete_handler: Arc<CompleteTrackHandler>,
        status_handler: Arc<GetCompletionStatusHandler>,
    ) -> Self {
        Self {
            complete_handler,
            status_handler,
        }
    }
}

/// POST /api/completion/:track - Complete a track
pub async fn complete_track(
    State(handlers): State<CompletionHandlers>,
    RequireAuth(user): RequireAuth,
    Path(track_id): Path<String>,
) -> Response {
    let cmd = CompleteTrackCommand {
        learner_id: user.learner_id,
        track_id,
    };

    match handlers.complete_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(CompletionResponse::from(result))).into_response(),
        Err(e) => handle_completion_error(e),
    }
}

/// GET /api/completion - Completion state of every track
pub async fn get_completion_status(
    State(handlers): State<CompletionHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let query = GetCompletionStatusQuery {
        learner_id: user.learner_id,
    };

    match handlers.status_handler.handle(query).await {
        Ok(statuses) => {
            let response = CompletionStatusResponse {
                tracks: statuses.into_iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_completion_error(e),
    }
}

fn handle_completion_error(error: CompletionError) -> Response {
    let details = error.missing_steps().map(|missing| {
        let steps: Vec<&str> = missing.iter().map(|s| s.as_str()).collect();
        serde_json::json!({ "missingSteps": steps })
    });
    error_response(error.code(), error.message(), details)
}
