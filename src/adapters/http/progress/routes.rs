//! HTTP routes for progress endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_progress, merge_progress, ProgressHandlers};

/// Creates the progress router, mounted at `/api/progress`.
pub fn progress_routes(handlers: ProgressHandlers) -> Router {
    Router::new()
        .route("/", post(merge_progress))
        .route("/:track", get(get_progress))
        .with_state(handlers)
}
