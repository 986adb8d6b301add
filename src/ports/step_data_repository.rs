//! Step data repository port.
//!
//! # Versioning
//!
//! Inserts start at version 1 and every write increments it. When the
//! caller passes `expected_version`:
//! - `Some(0)` means the row must not exist yet
//! - `Some(v)` means the stored version must equal `v`
//!
//! A mismatch fails with `VersionConflict`, carrying `expected` and, when a
//! row exists, `actual` details.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::{DomainError, ErrorCode, LearnerId, Timestamp, TrackId};
use crate::domain::step_data::{StepKey, StepRecord};

/// Builds the error returned on a version mismatch.
pub fn version_conflict(expected: i32, actual: Option<i32>) -> DomainError {
    let err = DomainError::new(
        ErrorCode::VersionConflict,
        "Step data was modified by another writer",
    )
    .with_detail("expected", expected.to_string());
    match actual {
        Some(actual) => err.with_detail("actual", actual.to_string()),
        None => err,
    }
}

/// Repository port for step payloads.
#[async_trait]
pub trait StepDataRepository: Send + Sync {
    /// Insert or update the row for `key`, reviving it if tombstoned.
    ///
    /// # Errors
    ///
    /// - `VersionConflict` if `expected_version` does not match
    /// - `DatabaseError` on persistence failure
    async fn upsert(
        &self,
        key: &StepKey,
        payload: &Value,
        expected_version: Option<i32>,
        now: Timestamp,
    ) -> Result<StepRecord, DomainError>;

    /// Find a row, tombstoned or not.
    async fn find(&self, key: &StepKey) -> Result<Option<StepRecord>, DomainError>;

    /// Live rows for a learner's track, ordered by step id.
    async fn list_for_track(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
    ) -> Result<Vec<StepRecord>, DomainError>;

    /// Every row of a learner, tombstones included.
    async fn list_for_learner(&self, learner_id: LearnerId) -> Result<Vec<StepRecord>, DomainError>;

    /// Irrecoverably delete every row of a learner. Returns rows removed.
    async fn hard_delete_for_learner(&self, learner_id: LearnerId) -> Result<u64, DomainError>;

    /// Tombstone every live row of a learner. Returns rows tombstoned.
    async fn soft_delete_for_learner(
        &self,
        learner_id: LearnerId,
        at: Timestamp,
    ) -> Result<u64, DomainError>;

    /// Hard-delete rows tombstoned strictly before `cutoff`.
    async fn purge_tombstoned_before(&self, cutoff: Timestamp) -> Result<u64, DomainError>;
}
