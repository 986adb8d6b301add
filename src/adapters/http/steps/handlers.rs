//! HTTP handlers for step data endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::error_response;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::steps::{
    GetStepHandler, GetStepQuery, ListStepsHandler, ListStepsQuery, UpsertStepCommand,
    UpsertStepHandler,
};
use crate::domain::step_data::StepDataError;

use super::dto::{StepListResponse, UpsertStepRequest};

#[derive(Clone)]
pub struct StepHandlers {
    upsert_handler: Arc<UpsertStepHandler>,
    get_handler: Arc<GetStepHandler>,
    list_handler: Arc<ListStepsHandler>,
}

impl StepHandlers {
    pub fn new(
        upsert_handler: Arc<UpsertStepHandler>,
        get_handler: Arc<GetStepHandler>,
        list_handler: Arc<ListStepsHandler>,
    ) -> Self {
        Self {
            upsert_handler,
            get_handler,
            list_handler,
        }
    }
}

/// GET /api/steps/:track - Live step rows of a track
pub async fn list_steps(
    State(handlers): State<StepHandlers>,
    RequireAuth(user): RequireAuth,
    Path(track_id): Path<String>,
) -> Response {
    let query = ListStepsQuery {
        learner_id: user.learner_id,
        track_id,
    };

    match handlers.list_handler.handle(query).await {
        Ok(steps) => (StatusCode::OK, Json(StepListResponse { steps })).into_response(),
        Err(e) => handle_step_error(e),
    }
}

/// GET /api/steps/:track/:step - One live step row
pub async fn get_step(
    State(handlers): State<StepHandlers>,
    RequireAuth(user): RequireAuth,
    Path((track_id, step_id)): Path<(String, String)>,
) -> Response {
    let query = GetStepQuery {
        learner_id: user.learner_id,
        track_id,
        step_id,
        include_deleted: false,
    };

    match handlers.get_handler.handle(query).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => handle_step_error(e),
    }
}

/// PUT /api/steps/:track/:step - Insert or update a step payload
pub async fn upsert_step(
    State(handlers): State<StepHandlers>,
    RequireAuth(user): RequireAuth,
    Path((track_id, step_id)): Path<(String, String)>,
    Json(req): Json<UpsertStepRequest>,
) -> Response {
    let cmd = UpsertStepCommand {
        learner_id: user.learner_id,
        track_id,
        step_id,
        payload: req.payload,
        expected_version: req.expected_version,
    };

    match handlers.upsert_handler.handle(cmd).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => handle_step_error(e),
    }
}

pub(crate) fn handle_step_error(error: StepDataError) -> Response {
    let details = match &error {
        StepDataError::VersionConflict { expected, actual } => Some(serde_json::json!({
            "expectedVersion": expected,
            "actualVersion": actual,
        })),
        _ => None,
    };
    error_response(error.code(), error.message(), details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{LearnerId, TrackId};

    #[test]
    fn locked_maps_to_403() {
        let response = handle_step_error(StepDataError::locked(TrackId::new("ast").unwrap()));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn version_conflict_maps_to_409() {
        let response = handle_step_error(StepDataError::version_conflict(1, Some(2)));
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn learner_not_found_maps_to_404() {
        let response =
            handle_step_error(StepDataError::learner_not_found(LearnerId::new(1).unwrap()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_maps_to_400() {
        let response = handle_step_error(StepDataError::validation("payload", "must be an object"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
