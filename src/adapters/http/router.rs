//! Top-level API router.
//!
//! Wires application handlers from ports, mounts every area under `/api`,
//! and applies auth, tracing, CORS and a request timeout.

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Json, Router};
use http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::handlers::{
    CompleteTrackHandler, CreateCheckpointHandler, DeleteCheckpointHandler,
    DeleteLearnerStepsHandler, GetCompletionStatusHandler, GetProgressHandler, GetStepHandler,
    ListCheckpointsHandler, ListLearnerStepsHandler, ListStepsHandler, MergeProgressHandler,
    ReclaimTombstonesHandler, RestoreCheckpointHandler, UpsertStepHandler,
};
use crate::domain::workshop::WorkshopCatalog;
use crate::ports::{
    ArtifactGenerator, CheckpointRepository, LearnerRepository, ProgressRepository,
    StepDataRepository,
};

use super::admin::{admin_routes, AdminHandlers};
use super::completion::{completion_routes, CompletionHandlers};
use super::middleware::{auth_middleware, AuthState};
use super::progress::{progress_routes, ProgressHandlers};
use super::steps::{step_routes, StepHandlers};

/// The ports every handler is built from.
#[derive(Clone)]
pub struct ServicePorts {
    pub progress: Arc<dyn ProgressRepository>,
    pub steps: Arc<dyn StepDataRepository>,
    pub learners: Arc<dyn LearnerRepository>,
    pub checkpoints: Arc<dyn CheckpointRepository>,
    pub artifacts: Arc<dyn ArtifactGenerator>,
}

/// Handler state for every API area.
#[derive(Clone)]
pub struct ApiHandlers {
    pub progress: ProgressHandlers,
    pub steps: StepHandlers,
    pub completion: CompletionHandlers,
    pub admin: AdminHandlers,
}

impl ApiHandlers {
    /// Builds every application handler over the given ports.
    pub fn wire(catalog: Arc<WorkshopCatalog>, ports: &ServicePorts) -> Self {
        let get_step = Arc::new(GetStepHandler::new(catalog.clone(), ports.steps.clone()));

        let progress = ProgressHandlers::new(
            Arc::new(MergeProgressHandler::new(
                catalog.clone(),
                ports.learners.clone(),
                ports.progress.clone(),
            )),
            Arc::new(GetProgressHandler::new(
                catalog.clone(),
                ports.learners.clone(),
                ports.progress.clone(),
            )),
        );

        let steps = StepHandlers::new(
            Arc::new(UpsertStepHandler::new(
                catalog.clone(),
                ports.learners.clone(),
                ports.steps.clone(),
            )),
            get_step.clone(),
            Arc::new(ListStepsHandler::new(catalog.clone(), ports.steps.clone())),
        );

        let completion = CompletionHandlers::new(
            Arc::new(CompleteTrackHandler::new(
                catalog.clone(),
                ports.learners.clone(),
                ports.progress.clone(),
                ports.artifacts.clone(),
            )),
            Arc::new(GetCompletionStatusHandler::new(catalog, ports.learners.clone())),
        );

        let admin = AdminHandlers::new(
            Arc::new(CreateCheckpointHandler::new(
                ports.learners.clone(),
                ports.checkpoints.clone(),
            )),
            Arc::new(ListCheckpointsHandler::new(ports.checkpoints.clone())),
            Arc::new(RestoreCheckpointHandler::new(ports.checkpoints.clone())),
            Arc::new(DeleteCheckpointHandler::new(ports.checkpoints.clone())),
            Arc::new(ListLearnerStepsHandler::new(ports.steps.clone())),
            get_step,
            Arc::new(DeleteLearnerStepsHandler::new(
                ports.learners.clone(),
                ports.steps.clone(),
            )),
            Arc::new(ReclaimTombstonesHandler::new(ports.steps.clone())),
        );

        Self {
            progress,
            steps,
            completion,
            admin,
        }
    }
}

/// HTTP-level settings for the router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub request_timeout: Duration,
    /// Allowed origins. Empty or `*` allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(parsed)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Creates the application router.
pub fn api_router(handlers: ApiHandlers, validator: AuthState, config: &RouterConfig) -> Router {
    let api = Router::new()
        .nest("/progress", progress_routes(handlers.progress))
        .nest("/steps", step_routes(handlers.steps))
        .nest("/completion", completion_routes(handlers.completion))
        .nest("/admin", admin_routes(handlers.admin))
        .layer(middleware::from_fn_with_state(validator, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
}
