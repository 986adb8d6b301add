//! Completion command and query handlers.

mod complete_track;
mod get_completion_status;

pub use complete_track::{CompleteTrackCommand, CompleteTrackHandler};
pub use get_completion_status::{GetCompletionStatusHandler, GetCompletionStatusQuery};
