//! PostgreSQL implementation of CheckpointRepository.
//!
//! Capture reads every learner table inside one REPEATABLE READ transaction.
//! Restore deletes and re-inserts inside one transaction; dropping the
//! transaction on any error rolls the whole restore back.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use super::rows::{
    db_error, row_to_checkpoint, row_to_collaborator_record, row_to_completion, row_to_progress,
    row_to_step, to_json,
};
use crate::domain::checkpoint::{Checkpoint, CheckpointData};
use crate::domain::completion::ArtifactReference;
use crate::domain::foundation::{CheckpointId, DomainError, LearnerId, Percentage};
use crate::ports::CheckpointRepository;

/// PostgreSQL implementation of CheckpointRepository.
#[derive(Clone)]
pub struct PostgresCheckpointRepository {
    pool: PgPool,
}

impl PostgresCheckpointRepository {
    /// Creates a new PostgresCheckpointRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn clear_learner(conn: &mut PgConnection, learner_id: LearnerId) -> Result<(), DomainError> {
    for table in [
        "navigation_progress",
        "workshop_step_data",
        "track_completions",
        "learner_records",
    ] {
        sqlx::query(&format!("DELETE FROM {} WHERE learner_id = $1", table))
            .bind(learner_id.value())
            .execute(&mut *conn)
            .await
            .map_err(|e| db_error(&format!("clear {}", table), e))?;
    }
    Ok(())
}

async fn insert_snapshot(
    conn: &mut PgConnection,
    learner_id: LearnerId,
    data: &CheckpointData,
) -> Result<(), DomainError> {
    for progress in &data.navigation_progress {
        sqlx::query(
            r#"
            INSERT INTO navigation_progress (
                learner_id, track_id, completed_steps, current_step_id, unlocked_steps,
                video_progress, downstream_content_unlocked, last_visited_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(learner_id.value())
        .bind(progress.track_id.as_str())
        .bind(to_json(&progress.completed_steps)?)
        .bind(progress.current_step_id.as_str())
        .bind(to_json(&progress.unlocked_steps)?)
        .bind(to_json(&progress.video_progress)?)
        .bind(progress.downstream_content_unlocked)
        .bind(progress.last_visited_at.as_datetime())
        .execute(&mut *conn)
        .await
        .map_err(|e| db_error("restore navigation progress", e))?;
    }

    for record in &data.step_data {
        sqlx::query(
            r#"
            INSERT INTO workshop_step_data (
                learner_id, track_id, step_id, payload, version, created_at, updated_at, deleted_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(learner_id.value())
        .bind(record.key.track_id.as_str())
        .bind(record.key.step_id.as_str())
        .bind(&record.payload)
        .bind(record.version)
        .bind(record.created_at.as_datetime())
        .bind(record.updated_at.as_datetime())
        .bind(record.deleted_at.as_ref().map(|t| *t.as_datetime()))
        .execute(&mut *conn)
        .await
        .map_err(|e| db_error("restore step data", e))?;
    }

    for completion in &data.completions {
        sqlx::query(
            r#"
            INSERT INTO track_completions (learner_id, track_id, completed_at, artifact_ref)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(learner_id.value())
        .bind(completion.track_id.as_str())
        .bind(completion.completed_at.as_datetime())
        .bind(completion.artifact.as_ref().map(ArtifactReference::as_str))
        .execute(&mut *conn)
        .await
        .map_err(|e| db_error("restore completion", e))?;
    }

    for record in &data.collaborator_records {
        sqlx::query(
            r#"
            INSERT INTO learner_records (learner_id, kind, payload, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(learner_id.value())
        .bind(record.kind.as_str())
        .bind(&record.payload)
        .bind(record.created_at.as_datetime())
        .execute(&mut *conn)
        .await
        .map_err(|e| db_error("restore learner record", e))?;
    }

    sqlx::query("UPDATE learners SET progress = $2 WHERE id = $1")
        .bind(learner_id.value())
        .bind(i32::from(data.learner_progress))
        .execute(&mut *conn)
        .await
        .map_err(|e| db_error("restore learner progress", e))?;

    Ok(())
}

#[async_trait]
impl CheckpointRepository for PostgresCheckpointRepository {
    async fn capture(&self, learner_id: LearnerId) -> Result<CheckpointData, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("set isolation level", e))?;

        let progress_rows = sqlx::query(
            r#"
            SELECT learner_id, track_id, completed_steps, current_step_id, unlocked_steps,
                   video_progress, downstream_content_unlocked, last_visited_at
            FROM navigation_progress WHERE learner_id = $1 ORDER BY track_id
            "#,
        )
        .bind(learner_id.value())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_error("capture navigation progress", e))?;

        let step_rows = sqlx::query(
            r#"
            SELECT learner_id, track_id, step_id, payload, version, created_at, updated_at, deleted_at
            FROM workshop_step_data WHERE learner_id = $1 ORDER BY track_id, step_id
            "#,
        )
        .bind(learner_id.value())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_error("capture step data", e))?;

        let record_rows = sqlx::query(
            "SELECT kind, payload, created_at FROM learner_records WHERE learner_id = $1 ORDER BY id",
        )
        .bind(learner_id.value())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_error("capture learner records", e))?;

        let completion_rows = sqlx::query(
            r#"
            SELECT learner_id, track_id, completed_at, artifact_ref
            FROM track_completions WHERE learner_id = $1 ORDER BY track_id
            "#,
        )
        .bind(learner_id.value())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_error("capture completions", e))?;

        let progress: Option<(i32,)> = sqlx::query_as("SELECT progress FROM learners WHERE id = $1")
            .bind(learner_id.value())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("capture learner progress", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit capture", e))?;

        Ok(CheckpointData {
            navigation_progress: progress_rows
                .iter()
                .map(row_to_progress)
                .collect::<Result<_, _>>()?,
            step_data: step_rows.iter().map(row_to_step).collect::<Result<_, _>>()?,
            collaborator_records: record_rows
                .iter()
                .map(row_to_collaborator_record)
                .collect::<Result<_, _>>()?,
            completions: completion_rows
                .iter()
                .map(row_to_completion)
                .collect::<Result<_, _>>()?,
            learner_progress: match progress {
                Some((value,)) => Percentage::try_from_i32(value)
                    .map_err(|e| db_error("decode learner progress", e))?,
                None => Percentage::ZERO,
            },
        })
    }

    async fn save(&self, checkpoint: &Checkpoint) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO checkpoints (id, learner_id, name, description, data, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(checkpoint.id.as_uuid())
        .bind(checkpoint.learner_id.value())
        .bind(&checkpoint.name)
        .bind(&checkpoint.description)
        .bind(to_json(&checkpoint.data)?)
        .bind(checkpoint.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("insert checkpoint", e))?;

        Ok(())
    }

    async fn list_for_learner(&self, learner_id: LearnerId) -> Result<Vec<Checkpoint>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, learner_id, name, description, data, created_at
            FROM checkpoints
            WHERE learner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(learner_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list checkpoints", e))?;

        rows.iter().map(row_to_checkpoint).collect()
    }

    async fn find(&self, id: &CheckpointId) -> Result<Option<Checkpoint>, DomainError> {
        let row = sqlx::query(
            "SELECT id, learner_id, name, description, data, created_at FROM checkpoints WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch checkpoint", e))?;

        row.as_ref().map(row_to_checkpoint).transpose()
    }

    async fn delete(&self, learner_id: LearnerId, id: &CheckpointId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM checkpoints WHERE id = $1 AND learner_id = $2")
            .bind(id.as_uuid())
            .bind(learner_id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete checkpoint", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn restore(&self, learner_id: LearnerId, data: &CheckpointData) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        clear_learner(&mut tx, learner_id).await?;
        insert_snapshot(&mut tx, learner_id, data).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit restore", e))?;

        Ok(())
    }
}
