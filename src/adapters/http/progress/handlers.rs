//! HTTP handlers for progress endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::error_response;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::progress::{
    GetProgressHandler, GetProgressQuery, MergeProgressCommand, MergeProgressHandler,
};
use crate::domain::progress::ProgressError;

use super::dto::MergeProgressRequest;

#[derive(Clone)]
pub struct ProgressHandlers {
    merge_handler: Arc<MergeProgressHandler>,
    get_handler: Arc<GetProgressHandler>,
}

impl ProgressHandlers {
    pub fn new(merge_handler: Arc<MergeProgressHandler>, get_handler: Arc<GetProgressHandler>) -> Self {
        Self {
            merge_handler,
            get_handler,
        }
    }
}

/// GET /api/progress/:track - Stored progress or the track default
pub async fn get_progress(
    State(handlers): State<ProgressHandlers>,
    RequireAuth(user): RequireAuth,
    Path(track_id): Path<String>,
) -> Response {
    let query = GetProgressQuery {
        learner_id: user.learner_id,
        track_id,
    };

    match handlers.get_handler.handle(query).await {
        Ok(progress) => (StatusCode::OK, Json(progress)).into_response(),
        Err(e) => handle_progress_error(e),
    }
}

/// POST /api/progress - Merge a partial progress update
pub async fn merge_progress(
    State(handlers): State<ProgressHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<MergeProgressRequest>,
) -> Response {
    let (track_id, update) = match req.into_update() {
        Ok(parts) => parts,
        Err(e) => return handle_progress_error(e.into()),
    };

    let cmd = MergeProgressCommand {
        learner_id: user.learner_id,
        track_id,
        update,
    };

    match handlers.merge_handler.handle(cmd).await {
        Ok(progress) => (StatusCode::OK, Json(progress)).into_response(),
        Err(e) => handle_progress_error(e),
    }
}

fn handle_progress_error(error: ProgressError) -> Response {
    error_response(error.code(), error.message(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_track_maps_to_400() {
        let response = handle_progress_error(ProgressError::unknown_track("zz"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_learner_maps_to_404() {
        let learner = crate::domain::foundation::LearnerId::new(77).unwrap();
        let response = handle_progress_error(ProgressError::learner_not_found(learner));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn infrastructure_maps_to_500() {
        let response = handle_progress_error(ProgressError::infrastructure("db down"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
