//! HTTP routes for completion endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{complete_track, get_completion_status, CompletionHandlers};

/// Creates the completion router, mounted at `/api/completion`.
pub fn completion_routes(handlers: CompletionHandlers) -> Router {
    Router::new()
        .route("/", get(get_completion_status))
        .route("/:track", post(complete_track))
        .with_state(handlers)
}
