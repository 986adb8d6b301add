//! HTTP adapter for track completion endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CompletionResponse, CompletionStatusResponse, TrackStatusResponse};
pub use handlers::CompletionHandlers;
pub use routes::completion_routes;
