//! HTTP routes for step data endpoints.

use axum::{routing::get, Router};

use super::handlers::{get_step, list_steps, upsert_step, StepHandlers};

/// Creates the step data router, mounted at `/api/steps`.
pub fn step_routes(handlers: StepHandlers) -> Router {
    Router::new()
        .route("/:track", get(list_steps))
        .route("/:track/:step", get(get_step).put(upsert_step))
        .with_state(handlers)
}
