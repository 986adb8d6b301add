//! Completion module - the `InProgress -> Completed` lifecycle per track.

mod errors;
mod status;

pub use errors::CompletionError;
pub use status::{
    ArtifactOutcome, ArtifactReference, CompletionRecord, CompletionResult,
    TrackCompletionStatus, TrackStatus,
};
