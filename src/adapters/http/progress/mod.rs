//! HTTP adapter for navigation progress endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::MergeProgressRequest;
pub use handlers::ProgressHandlers;
pub use routes::progress_routes;
