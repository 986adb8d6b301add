//! PostgreSQL implementation of StepDataRepository.
//!
//! Version checks happen inside the write statement itself (`WHERE version
//! = $n` or `ON CONFLICT DO NOTHING`), so two writers holding the same
//! version cannot both succeed.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::rows::{db_error, row_to_step};
use crate::domain::foundation::{DomainError, LearnerId, Timestamp, TrackId};
use crate::domain::step_data::{StepKey, StepRecord};
use crate::ports::{version_conflict, StepDataRepository};

const STEP_COLUMNS: &str =
    "learner_id, track_id, step_id, payload, version, created_at, updated_at, deleted_at";

/// PostgreSQL implementation of StepDataRepository.
#[derive(Clone)]
pub struct PostgresStepDataRepository {
    pool: PgPool,
}

impl PostgresStepDataRepository {
    /// Creates a new PostgresStepDataRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_version(&self, key: &StepKey) -> Result<Option<i32>, DomainError> {
        let version: Option<(i32,)> = sqlx::query_as(
            "SELECT version FROM workshop_step_data WHERE learner_id = $1 AND track_id = $2 AND step_id = $3",
        )
        .bind(key.learner_id.value())
        .bind(key.track_id.as_str())
        .bind(key.step_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch step version", e))?;

        Ok(version.map(|(v,)| v))
    }

    async fn upsert_unchecked(
        &self,
        key: &StepKey,
        payload: &Value,
        now: Timestamp,
    ) -> Result<StepRecord, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO workshop_step_data (
                learner_id, track_id, step_id, payload, version, created_at, updated_at, deleted_at
            ) VALUES ($1, $2, $3, $4, 1, $5, $5, NULL)
            ON CONFLICT (learner_id, track_id, step_id) DO UPDATE SET
                payload = EXCLUDED.payload,
                version = workshop_step_data.version + 1,
                updated_at = EXCLUDED.updated_at,
                deleted_at = NULL
            RETURNING {}
            "#,
            STEP_COLUMNS
        ))
        .bind(key.learner_id.value())
        .bind(key.track_id.as_str())
        .bind(key.step_id.as_str())
        .bind(payload)
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("upsert step data", e))?;

        row_to_step(&row)
    }

    async fn insert_new(
        &self,
        key: &StepKey,
        payload: &Value,
        now: Timestamp,
    ) -> Result<StepRecord, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO workshop_step_data (
                learner_id, track_id, step_id, payload, version, created_at, updated_at, deleted_at
            ) VALUES ($1, $2, $3, $4, 1, $5, $5, NULL)
            ON CONFLICT (learner_id, track_id, step_id) DO NOTHING
            RETURNING {}
            "#,
            STEP_COLUMNS
        ))
        .bind(key.learner_id.value())
        .bind(key.track_id.as_str())
        .bind(key.step_id.as_str())
        .bind(payload)
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("insert step data", e))?;

        match row {
            Some(row) => row_to_step(&row),
            None => Err(version_conflict(0, self.current_version(key).await?)),
        }
    }

    async fn update_at_version(
        &self,
        key: &StepKey,
        payload: &Value,
        expected: i32,
        now: Timestamp,
    ) -> Result<StepRecord, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE workshop_step_data SET
                payload = $4,
                version = version + 1,
                updated_at = $5,
                deleted_at = NULL
            WHERE learner_id = $1 AND track_id = $2 AND step_id = $3 AND version = $6
            RETURNING {}
            "#,
            STEP_COLUMNS
        ))
        .bind(key.learner_id.value())
        .bind(key.track_id.as_str())
        .bind(key.step_id.as_str())
        .bind(payload)
        .bind(now.as_datetime())
        .bind(expected)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("update step data", e))?;

        match row {
            Some(row) => row_to_step(&row),
            None => Err(version_conflict(expected, self.current_version(key).await?)),
        }
    }
}

#[async_trait]
impl StepDataRepository for PostgresStepDataRepository {
    async fn upsert(
        &self,
        key: &StepKey,
        payload: &Value,
        expected_version: Option<i32>,
        now: Timestamp,
    ) -> Result<StepRecord, DomainError> {
        match expected_version {
            None => self.upsert_unchecked(key, payload, now).await,
            Some(0) => self.insert_new(key, payload, now).await,
            Some(expected) => self.update_at_version(key, payload, expected, now).await,
        }
    }

    async fn find(&self, key: &StepKey) -> Result<Option<StepRecord>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM workshop_step_data WHERE learner_id = $1 AND track_id = $2 AND step_id = $3",
            STEP_COLUMNS
        ))
        .bind(key.learner_id.value())
        .bind(key.track_id.as_str())
        .bind(key.step_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch step data", e))?;

        row.as_ref().map(row_to_step).transpose()
    }

    async fn list_for_track(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
    ) -> Result<Vec<StepRecord>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM workshop_step_data
            WHERE learner_id = $1 AND track_id = $2 AND deleted_at IS NULL
            ORDER BY step_id
            "#,
            STEP_COLUMNS
        ))
        .bind(learner_id.value())
        .bind(track_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list step data", e))?;

        rows.iter().map(row_to_step).collect()
    }

    async fn list_for_learner(&self, learner_id: LearnerId) -> Result<Vec<StepRecord>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM workshop_step_data WHERE learner_id = $1 ORDER BY track_id, step_id",
            STEP_COLUMNS
        ))
        .bind(learner_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list learner step data", e))?;

        rows.iter().map(row_to_step).collect()
    }

    async fn hard_delete_for_learner(&self, learner_id: LearnerId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM workshop_step_data WHERE learner_id = $1")
            .bind(learner_id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete step data", e))?;

        Ok(result.rows_affected())
    }

    async fn soft_delete_for_learner(
        &self,
        learner_id: LearnerId,
        at: Timestamp,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE workshop_step_data SET deleted_at = $2, updated_at = $2
            WHERE learner_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(learner_id.value())
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("soft delete step data", e))?;

        Ok(result.rows_affected())
    }

    async fn purge_tombstoned_before(&self, cutoff: Timestamp) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "DELETE FROM workshop_step_data WHERE deleted_at IS NOT NULL AND deleted_at < $1",
        )
        .bind(cutoff.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("purge tombstoned step data", e))?;

        Ok(result.rows_affected())
    }
}
