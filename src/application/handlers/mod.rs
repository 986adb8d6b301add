//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod checkpoint;
pub mod cleanup;
pub mod completion;
pub mod progress;
pub mod steps;

pub use checkpoint::{
    CreateCheckpointCommand, CreateCheckpointHandler, DeleteCheckpointCommand,
    DeleteCheckpointHandler, ListCheckpointsHandler, ListCheckpointsQuery,
    RestoreCheckpointCommand, RestoreCheckpointHandler,
};
pub use cleanup::{ReclaimTombstonesCommand, ReclaimTombstonesHandler, DEFAULT_RETENTION_MONTHS};
pub use completion::{
    CompleteTrackCommand, CompleteTrackHandler, GetCompletionStatusHandler,
    GetCompletionStatusQuery,
};
pub use progress::{GetProgressHandler, GetProgressQuery, MergeProgressCommand, MergeProgressHandler};
pub use steps::{
    DeleteLearnerStepsCommand, DeleteLearnerStepsHandler, GetStepHandler, GetStepQuery,
    ListLearnerStepsHandler, ListLearnerStepsQuery, ListStepsHandler, ListStepsQuery,
    UpsertStepCommand, UpsertStepHandler,
};
