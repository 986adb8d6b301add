//! HTTP handlers for operator endpoints.
//!
//! These act on the learner named in the path, not on the caller.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{bad_request, error_response};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::steps::{handle_step_error, StepListResponse};
use crate::application::handlers::checkpoint::{
    CreateCheckpointCommand, CreateCheckpointHandler, DeleteCheckpointCommand,
    DeleteCheckpointHandler, ListCheckpointsHandler, ListCheckpointsQuery,
    RestoreCheckpointCommand, RestoreCheckpointHandler,
};
use crate::application::handlers::cleanup::{
    ReclaimTombstonesCommand, ReclaimTombstonesHandler, MAX_RETENTION_MONTHS,
};
use crate::application::handlers::steps::{
    DeleteLearnerStepsCommand, DeleteLearnerStepsHandler, GetStepHandler, GetStepQuery,
    ListLearnerStepsHandler, ListLearnerStepsQuery,
};
use crate::domain::checkpoint::CheckpointError;
use crate::domain::foundation::{CheckpointId, LearnerId};

use super::dto::{
    CheckpointListResponse, CheckpointSummaryResponse, CreateCheckpointRequest, ReclaimRequest,
    RestoreCheckpointResponse,
};

#[derive(Clone)]
pub struct AdminHandlers {
    create_checkpoint: Arc<CreateCheckpointHandler>,
    list_checkpoints: Arc<ListCheckpointsHandler>,
    restore_checkpoint: Arc<RestoreCheckpointHandler>,
    delete_checkpoint: Arc<DeleteCheckpointHandler>,
    list_learner_steps: Arc<ListLearnerStepsHandler>,
    get_step: Arc<GetStepHandler>,
    delete_learner_steps: Arc<DeleteLearnerStepsHandler>,
    reclaim: Arc<ReclaimTombstonesHandler>,
}

impl AdminHandlers {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        create_checkpoint: Arc<CreateCheckpointHandler>,
        list_checkpoints: Arc<ListCheckpointsHandler>,
        restore_checkpoint: Arc<RestoreCheckpointHandler>,
        delete_checkpoint: Arc<DeleteCheckpointHandler>,
        list_learner_steps: Arc<ListLearnerStepsHandler>,
        get_step: Arc<GetStepHandler>,
        delete_learner_steps: Arc<DeleteLearnerStepsHandler>,
        reclaim: Arc<ReclaimTombstonesHandler>,
    ) -> Self {
        Self {
            create_checkpoint,
            list_checkpoints,
            restore_checkpoint,
            delete_checkpoint,
            list_learner_steps,
            get_step,
            delete_learner_steps,
            reclaim,
        }
    }
}

fn parse_learner(raw: &str) -> Result<LearnerId, Response> {
    raw.parse::<LearnerId>()
        .map_err(|_| bad_request("Invalid learner ID"))
}

fn parse_checkpoint(raw: &str) -> Result<CheckpointId, Response> {
    raw.parse::<CheckpointId>()
        .map_err(|_| bad_request("Invalid checkpoint ID"))
}

// ════════════════════════════════════════════════════════════════════════════
// Checkpoints
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/learners/:learner/checkpoints - Newest first
pub async fn list_checkpoints(
    State(handlers): State<AdminHandlers>,
    RequireAuth(_operator): RequireAuth,
    Path(learner): Path<String>,
) -> Response {
    let learner_id = match parse_learner(&learner) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .list_checkpoints
        .handle(ListCheckpointsQuery { learner_id })
        .await
    {
        Ok(checkpoints) => {
            let response = CheckpointListResponse {
                checkpoints: checkpoints.iter().map(Into::into).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_checkpoint_error(e),
    }
}

/// POST /api/admin/learners/:learner/checkpoints - Capture a checkpoint
pub async fn create_checkpoint(
    State(handlers): State<AdminHandlers>,
    RequireAuth(_operator): RequireAuth,
    Path(learner): Path<String>,
    Json(req): Json<CreateCheckpointRequest>,
) -> Response {
    let learner_id = match parse_learner(&learner) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = CreateCheckpointCommand {
        learner_id,
        name: req.name,
        description: req.description,
    };

    match handlers.create_checkpoint.handle(cmd).await {
        Ok(checkpoint) => (
            StatusCode::CREATED,
            Json(CheckpointSummaryResponse::from(&checkpoint)),
        )
            .into_response(),
        Err(e) => handle_checkpoint_error(e),
    }
}

/// POST /api/admin/learners/:learner/checkpoints/:id/restore
pub async fn restore_checkpoint(
    State(handlers): State<AdminHandlers>,
    RequireAuth(_operator): RequireAuth,
    Path((learner, checkpoint)): Path<(String, String)>,
) -> Response {
    let (learner_id, checkpoint_id) = match (parse_learner(&learner), parse_checkpoint(&checkpoint)) {
        (Ok(l), Ok(c)) => (l, c),
        (Err(response), _) | (_, Err(response)) => return response,
    };

    let cmd = RestoreCheckpointCommand {
        learner_id,
        checkpoint_id,
    };

    match handlers.restore_checkpoint.handle(cmd).await {
        Ok(restored) => {
            let response = RestoreCheckpointResponse {
                checkpoint_id: restored.id.to_string(),
                restored: true,
                message: format!("Restored checkpoint '{}'", restored.name),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_checkpoint_error(e),
    }
}

/// DELETE /api/admin/learners/:learner/checkpoints/:id
pub async fn delete_checkpoint(
    State(handlers): State<AdminHandlers>,
    RequireAuth(_operator): RequireAuth,
    Path((learner, checkpoint)): Path<(String, String)>,
) -> Response {
    let (learner_id, checkpoint_id) = match (parse_learner(&learner), parse_checkpoint(&checkpoint)) {
        (Ok(l), Ok(c)) => (l, c),
        (Err(response), _) | (_, Err(response)) => return response,
    };

    let cmd = DeleteCheckpointCommand {
        learner_id,
        checkpoint_id,
    };

    match handlers.delete_checkpoint.handle(cmd).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_checkpoint_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Learner step data
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/learners/:learner/steps - Every row, tombstones included
pub async fn list_learner_steps(
    State(handlers): State<AdminHandlers>,
    RequireAuth(_operator): RequireAuth,
    Path(learner): Path<String>,
) -> Response {
    let learner_id = match parse_learner(&learner) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .list_learner_steps
        .handle(ListLearnerStepsQuery { learner_id })
        .await
    {
        Ok(steps) => (StatusCode::OK, Json(StepListResponse { steps })).into_response(),
        Err(e) => handle_step_error(e),
    }
}

/// GET /api/admin/learners/:learner/steps/:track/:step - Tombstones included
pub async fn get_learner_step(
    State(handlers): State<AdminHandlers>,
    RequireAuth(_operator): RequireAuth,
    Path((learner, track_id, step_id)): Path<(String, String, String)>,
) -> Response {
    let learner_id = match parse_learner(&learner) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = GetStepQuery {
        learner_id,
        track_id,
        step_id,
        include_deleted: true,
    };

    match handlers.get_step.handle(query).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => handle_step_error(e),
    }
}

/// DELETE /api/admin/learners/:learner/steps - Hard or soft delete by learner kind
pub async fn delete_learner_steps(
    State(handlers): State<AdminHandlers>,
    RequireAuth(_operator): RequireAuth,
    Path(learner): Path<String>,
) -> Response {
    let learner_id = match parse_learner(&learner) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .delete_learner_steps
        .handle(DeleteLearnerStepsCommand { learner_id })
        .await
    {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => handle_step_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Maintenance
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/admin/maintenance/reclaim - Purge old tombstones
pub async fn reclaim_tombstones(
    State(handlers): State<AdminHandlers>,
    RequireAuth(_operator): RequireAuth,
    body: Option<Json<ReclaimRequest>>,
) -> Response {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    if let Some(months) = req.retention_months {
        if months == 0 || months > MAX_RETENTION_MONTHS {
            return bad_request(format!(
                "retentionMonths must be between 1 and {}",
                MAX_RETENTION_MONTHS
            ));
        }
    }

    let outcome = handlers
        .reclaim
        .handle(ReclaimTombstonesCommand {
            retention_months: req.retention_months,
        })
        .await;

    (StatusCode::OK, Json(outcome)).into_response()
}

fn handle_checkpoint_error(error: CheckpointError) -> Response {
    error_response(error.code(), error.message(), None)
}
