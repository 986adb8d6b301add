//! Workshop Progress - learner progress tracking for self-paced workshops
//!
//! Persists per-track navigation state and versioned step payloads,
//! completes tracks against a data-driven catalog, and snapshots a
//! learner's whole workshop state into restorable checkpoints.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
