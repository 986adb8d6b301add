//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `workshop` - Track definitions and the workshop catalog
//! - `progress` - Navigation progress and the merge engine
//! - `step_data` - Versioned, soft-deletable step payloads
//! - `completion` - Track completion lifecycle and results
//! - `checkpoint` - Snapshots of a learner's full workshop state
//! - `learner` - Learner classification and aggregate progress

pub mod checkpoint;
pub mod completion;
pub mod foundation;
pub mod learner;
pub mod progress;
pub mod step_data;
pub mod workshop;
