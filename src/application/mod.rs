//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Progress
    GetProgressHandler, GetProgressQuery, MergeProgressCommand, MergeProgressHandler,
    // Step data
    DeleteLearnerStepsCommand, DeleteLearnerStepsHandler, GetStepHandler, GetStepQuery,
    ListLearnerStepsHandler, ListLearnerStepsQuery, ListStepsHandler, ListStepsQuery,
    UpsertStepCommand, UpsertStepHandler,
    // Completion
    CompleteTrackCommand, CompleteTrackHandler, GetCompletionStatusHandler,
    GetCompletionStatusQuery,
    // Checkpoints
    CreateCheckpointCommand, CreateCheckpointHandler, DeleteCheckpointCommand,
    DeleteCheckpointHandler, ListCheckpointsHandler, ListCheckpointsQuery,
    RestoreCheckpointCommand, RestoreCheckpointHandler,
    // Maintenance
    ReclaimTombstonesCommand, ReclaimTombstonesHandler, DEFAULT_RETENTION_MONTHS,
};
