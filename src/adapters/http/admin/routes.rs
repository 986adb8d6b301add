//! HTTP routes for operator endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    create_checkpoint, delete_checkpoint, delete_learner_steps, get_learner_step,
    list_checkpoints, list_learner_steps, reclaim_tombstones, restore_checkpoint, AdminHandlers,
};

/// Creates the operator router, mounted at `/api/admin`.
pub fn admin_routes(handlers: AdminHandlers) -> Router {
    Router::new()
        .route(
            "/learners/:learner/checkpoints",
            get(list_checkpoints).post(create_checkpoint),
        )
        .route(
            "/learners/:learner/checkpoints/:id/restore",
            post(restore_checkpoint),
        )
        .route("/learners/:learner/checkpoints/:id", delete(delete_checkpoint))
        .route(
            "/learners/:learner/steps",
            get(list_learner_steps).delete(delete_learner_steps),
        )
        .route("/learners/:learner/steps/:track/:step", get(get_learner_step))
        .route("/maintenance/reclaim", post(reclaim_tombstones))
        .with_state(handlers)
}
