//! HTTP adapter for operator endpoints: checkpoints, learner step data,
//! and maintenance.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CheckpointListResponse, CheckpointSummaryResponse, CreateCheckpointRequest, ReclaimRequest,
    RestoreCheckpointResponse,
};
pub use handlers::AdminHandlers;
pub use routes::admin_routes;
