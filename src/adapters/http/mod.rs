//! HTTP adapters - REST API implementations.
//!
//! Each area has its own dto/handlers/routes modules; `router` composes
//! them under `/api`.

pub mod admin;
pub mod completion;
pub mod error;
pub mod middleware;
pub mod progress;
pub mod router;
pub mod steps;

pub use error::ErrorResponse;
pub use router::{api_router, ApiHandlers, RouterConfig, ServicePorts};
