//! HTTP adapter for step data endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{StepListResponse, UpsertStepRequest};
pub(crate) use handlers::handle_step_error;
pub use handlers::StepHandlers;
pub use routes::step_routes;
