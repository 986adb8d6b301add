//! PostgreSQL implementation of ProgressRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::{db_error, row_to_progress, to_json};
use crate::domain::foundation::{DomainError, LearnerId, Timestamp, TrackId};
use crate::domain::progress::{NavigationProgress, ProgressChange};
use crate::ports::ProgressRepository;

/// PostgreSQL implementation of ProgressRepository.
#[derive(Clone)]
pub struct PostgresProgressRepository {
    pool: PgPool,
}

impl PostgresProgressRepository {
    /// Creates a new PostgresProgressRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressRepository for PostgresProgressRepository {
    async fn find(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
    ) -> Result<Option<NavigationProgress>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT learner_id, track_id, completed_steps, current_step_id, unlocked_steps,
                   video_progress, downstream_content_unlocked, last_visited_at
            FROM navigation_progress
            WHERE learner_id = $1 AND track_id = $2
            "#,
        )
        .bind(learner_id.value())
        .bind(track_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch navigation progress", e))?;

        row.as_ref().map(row_to_progress).transpose()
    }

    async fn apply(
        &self,
        initial: NavigationProgress,
        change: &ProgressChange,
        now: Timestamp,
    ) -> Result<NavigationProgress, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO navigation_progress (
                learner_id, track_id, completed_steps, current_step_id, unlocked_steps,
                video_progress, downstream_content_unlocked, last_visited_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (learner_id, track_id) DO NOTHING
            "#,
        )
        .bind(initial.learner_id.value())
        .bind(initial.track_id.as_str())
        .bind(to_json(&initial.completed_steps)?)
        .bind(initial.current_step_id.as_str())
        .bind(to_json(&initial.unlocked_steps)?)
        .bind(to_json(&initial.video_progress)?)
        .bind(initial.downstream_content_unlocked)
        .bind(initial.last_visited_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("create navigation progress", e))?;

        // Row lock serializes concurrent merges for this (learner, track).
        let row = sqlx::query(
            r#"
            SELECT learner_id, track_id, completed_steps, current_step_id, unlocked_steps,
                   video_progress, downstream_content_unlocked, last_visited_at
            FROM navigation_progress
            WHERE learner_id = $1 AND track_id = $2
            FOR UPDATE
            "#,
        )
        .bind(initial.learner_id.value())
        .bind(initial.track_id.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("lock navigation progress", e))?;

        let updated = change.apply(row_to_progress(&row)?, now);

        sqlx::query(
            r#"
            UPDATE navigation_progress SET
                completed_steps = $3,
                current_step_id = $4,
                unlocked_steps = $5,
                video_progress = $6,
                downstream_content_unlocked = $7,
                last_visited_at = $8
            WHERE learner_id = $1 AND track_id = $2
            "#,
        )
        .bind(updated.learner_id.value())
        .bind(updated.track_id.as_str())
        .bind(to_json(&updated.completed_steps)?)
        .bind(updated.current_step_id.as_str())
        .bind(to_json(&updated.unlocked_steps)?)
        .bind(to_json(&updated.video_progress)?)
        .bind(updated.downstream_content_unlocked)
        .bind(updated.last_visited_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("update navigation progress", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("commit navigation progress", e))?;

        Ok(updated)
    }
}
