//! Checkpoint command and query handlers.

mod create_checkpoint;
mod delete_checkpoint;
mod list_checkpoints;
mod restore_checkpoint;

pub use create_checkpoint::{CreateCheckpointCommand, CreateCheckpointHandler};
pub use delete_checkpoint::{DeleteCheckpointCommand, DeleteCheckpointHandler};
pub use list_checkpoints::{ListCheckpointsHandler, ListCheckpointsQuery};
pub use restore_checkpoint::{RestoreCheckpointCommand, RestoreCheckpointHandler};
