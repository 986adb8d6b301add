//! Step payload records and deletion strategies.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::domain::foundation::{LearnerId, StepId, Timestamp, TrackId, ValidationError};

/// Composite key of a step record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepKey {
    pub learner_id: LearnerId,
    pub track_id: TrackId,
    pub step_id: StepId,
}

impl StepKey {
    pub fn new(learner_id: LearnerId, track_id: TrackId, step_id: StepId) -> Self {
        Self {
            learner_id,
            track_id,
            step_id,
        }
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.learner_id, self.track_id, self.step_id)
    }
}

/// A learner's saved payload for one step.
///
/// `version` starts at 1 and increments on every write. A set `deleted_at`
/// marks the row as tombstoned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    #[serde(flatten)]
    pub key: StepKey,
    pub payload: Value,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl StepRecord {
    /// A freshly inserted record.
    pub fn new(key: StepKey, payload: Value, now: Timestamp) -> Self {
        Self {
            key,
            payload,
            version: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_tombstoned(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Overwrites the payload, bumping the version and reviving a tombstone.
    pub fn overwrite(&mut self, payload: Value, now: Timestamp) {
        self.payload = payload;
        self.version += 1;
        self.updated_at = now;
        self.deleted_at = None;
    }

    /// Marks the record deleted.
    pub fn tombstone(&mut self, at: Timestamp) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }

    /// Returns true if the tombstone is older than `cutoff`.
    pub fn tombstoned_before(&self, cutoff: &Timestamp) -> bool {
        matches!(&self.deleted_at, Some(at) if at.is_before(cutoff))
    }
}

/// Step payloads are opaque, but must be JSON objects.
pub fn validate_payload(payload: &Value) -> Result<(), ValidationError> {
    if payload.is_object() {
        Ok(())
    } else {
        Err(ValidationError::invalid_format(
            "payload",
            "step payload must be a JSON object",
        ))
    }
}

/// How a learner's step data is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteStrategy {
    /// Rows are removed irrecoverably. Used for test learners.
    Hard,
    /// Rows are tombstoned and reclaimed later by the cleanup sweep.
    Soft,
}

impl DeleteStrategy {
    pub fn for_learner(is_test_learner: bool) -> Self {
        if is_test_learner {
            DeleteStrategy::Hard
        } else {
            DeleteStrategy::Soft
        }
    }
}

/// Outcome of deleting all step data for a learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionSummary {
    pub strategy: DeleteStrategy,
    pub affected_rows: u64,
}

/// Result of a tombstone reclaim pass. Failures are reported, not raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReclaimOutcome {
    Reclaimed { count: u64 },
    Failed { reason: String },
}

impl ReclaimOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ReclaimOutcome::Failed { .. })
    }
}
