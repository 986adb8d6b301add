//! In-memory adapters for tests and local development.

mod workshop_store;

pub use workshop_store::InMemoryWorkshopStore;
