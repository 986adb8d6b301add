//! Step data module - per-step payloads with versioning and tombstones.

mod errors;
mod record;

pub use errors::StepDataError;
pub use record::{validate_payload, DeleteStrategy, DeletionSummary, ReclaimOutcome, StepKey, StepRecord};
