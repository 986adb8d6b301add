//! PostgreSQL implementation of LearnerRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::rows::{db_error, row_to_completion};
use crate::domain::completion::{ArtifactReference, CompletionRecord};
use crate::domain::foundation::{DomainError, LearnerId, Percentage, TrackId};
use crate::domain::learner::Learner;
use crate::ports::LearnerRepository;

/// PostgreSQL implementation of LearnerRepository.
#[derive(Clone)]
pub struct PostgresLearnerRepository {
    pool: PgPool,
}

impl PostgresLearnerRepository {
    /// Creates a new PostgresLearnerRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LearnerRepository for PostgresLearnerRepository {
    async fn find(&self, learner_id: LearnerId) -> Result<Option<Learner>, DomainError> {
        let row = sqlx::query("SELECT id, is_test_learner, progress FROM learners WHERE id = $1")
            .bind(learner_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch learner", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let is_test_learner: bool = row
            .try_get("is_test_learner")
            .map_err(|e| db_error("get is_test_learner", e))?;
        let progress: i32 = row
            .try_get("progress")
            .map_err(|e| db_error("get progress", e))?;

        Ok(Some(Learner {
            id: learner_id,
            is_test_learner,
            progress: Percentage::try_from_i32(progress)
                .map_err(|e| db_error("decode progress", e))?,
        }))
    }

    async fn list_completions(
        &self,
        learner_id: LearnerId,
    ) -> Result<Vec<CompletionRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT learner_id, track_id, completed_at, artifact_ref
            FROM track_completions
            WHERE learner_id = $1
            ORDER BY track_id
            "#,
        )
        .bind(learner_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list completions", e))?;

        rows.iter().map(row_to_completion).collect()
    }

    async fn find_completion(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
    ) -> Result<Option<CompletionRecord>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT learner_id, track_id, completed_at, artifact_ref
            FROM track_completions
            WHERE learner_id = $1 AND track_id = $2
            "#,
        )
        .bind(learner_id.value())
        .bind(track_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch completion", e))?;

        row.as_ref().map(row_to_completion).transpose()
    }

    async fn record_completion(&self, record: &CompletionRecord) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO track_completions (learner_id, track_id, completed_at, artifact_ref)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (learner_id, track_id) DO NOTHING
            "#,
        )
        .bind(record.learner_id.value())
        .bind(record.track_id.as_str())
        .bind(record.completed_at.as_datetime())
        .bind(record.artifact.as_ref().map(ArtifactReference::as_str))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("record completion", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn attach_artifact(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
        artifact: &ArtifactReference,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE track_completions SET artifact_ref = $3 WHERE learner_id = $1 AND track_id = $2",
        )
        .bind(learner_id.value())
        .bind(track_id.as_str())
        .bind(artifact.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("attach artifact", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::database(format!(
                "No completion record for learner {} track {}",
                learner_id, track_id
            )));
        }

        Ok(())
    }
}
