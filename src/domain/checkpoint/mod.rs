//! Checkpoint module - named snapshots of a learner's workshop state.

mod errors;
mod snapshot;

pub use errors::CheckpointError;
pub use snapshot::{
    Checkpoint, CheckpointData, CollaboratorRecord, RecordKind, MAX_CHECKPOINT_DESCRIPTION_LEN,
    MAX_CHECKPOINT_NAME_LEN,
};
