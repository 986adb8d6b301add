//! Progress module - navigation state per learner and track.

mod errors;
mod merge;
mod navigation;

pub use errors::ProgressError;
pub use merge::{dedupe_steps, merge_progress, ProgressChange};
pub use navigation::{NavigationProgress, ProgressUpdate, VideoProgress};
