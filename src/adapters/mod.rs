//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-memory storage for tests and local development
//! - `postgres` - PostgreSQL storage via sqlx
//! - `artifact` - Summary artifact generator clients
//! - `auth` - Session validators
//! - `cleanup` - Background tombstone sweeper
//! - `http` - axum REST API

pub mod artifact;
pub mod auth;
pub mod cleanup;
pub mod http;
pub mod memory;
pub mod postgres;

pub use cleanup::{TombstoneSweeper, TombstoneSweeperConfig};
pub use memory::InMemoryWorkshopStore;
