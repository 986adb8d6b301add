//! Progress command and query handlers.

mod get_progress;
mod merge_progress;

pub use get_progress::{GetProgressHandler, GetProgressQuery};
pub use merge_progress::{MergeProgressCommand, MergeProgressHandler};
