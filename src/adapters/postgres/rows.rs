//! Row mapping shared by the PostgreSQL adapters.

use serde::de::DeserializeOwned;
use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::domain::checkpoint::{Checkpoint, CollaboratorRecord};
use crate::domain::completion::{ArtifactReference, CompletionRecord};
use crate::domain::foundation::{
    CheckpointId, DomainError, LearnerId, StepId, Timestamp, TrackId,
};
use crate::domain::progress::NavigationProgress;
use crate::domain::step_data::{StepKey, StepRecord};

pub(super) fn db_error(action: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::database(format!("Failed to {}: {}", action, e))
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| db_error(&format!("get {}", name), e))
}

fn json_column<T: DeserializeOwned>(row: &PgRow, name: &str) -> Result<T, DomainError> {
    let value: serde_json::Value = column(row, name)?;
    serde_json::from_value(value).map_err(|e| db_error(&format!("decode {}", name), e))
}

fn timestamp(row: &PgRow, name: &str) -> Result<Timestamp, DomainError> {
    let dt: chrono::DateTime<chrono::Utc> = column(row, name)?;
    Ok(Timestamp::from_datetime(dt))
}

fn optional_timestamp(row: &PgRow, name: &str) -> Result<Option<Timestamp>, DomainError> {
    let dt: Option<chrono::DateTime<chrono::Utc>> = column(row, name)?;
    Ok(dt.map(Timestamp::from_datetime))
}

fn learner_id(row: &PgRow) -> Result<LearnerId, DomainError> {
    let id: i64 = column(row, "learner_id")?;
    LearnerId::new(id).map_err(|e| db_error("decode learner_id", e))
}

fn track_id(row: &PgRow) -> Result<TrackId, DomainError> {
    let id: String = column(row, "track_id")?;
    TrackId::new(id).map_err(|e| db_error("decode track_id", e))
}

pub(super) fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(value).map_err(|e| db_error("encode json", e))
}

pub(super) fn row_to_progress(row: &PgRow) -> Result<NavigationProgress, DomainError> {
    let current: String = column(row, "current_step_id")?;
    Ok(NavigationProgress {
        learner_id: learner_id(row)?,
        track_id: track_id(row)?,
        completed_steps: json_column(row, "completed_steps")?,
        current_step_id: StepId::new(current).map_err(|e| db_error("decode current_step_id", e))?,
        unlocked_steps: json_column(row, "unlocked_steps")?,
        video_progress: json_column(row, "video_progress")?,
        downstream_content_unlocked: column(row, "downstream_content_unlocked")?,
        last_visited_at: timestamp(row, "last_visited_at")?,
    })
}

pub(super) fn row_to_step(row: &PgRow) -> Result<StepRecord, DomainError> {
    let step: String = column(row, "step_id")?;
    Ok(StepRecord {
        key: StepKey::new(
            learner_id(row)?,
            track_id(row)?,
            StepId::new(step).map_err(|e| db_error("decode step_id", e))?,
        ),
        payload: column(row, "payload")?,
        version: column(row, "version")?,
        created_at: timestamp(row, "created_at")?,
        updated_at: timestamp(row, "updated_at")?,
        deleted_at: optional_timestamp(row, "deleted_at")?,
    })
}

pub(super) fn row_to_completion(row: &PgRow) -> Result<CompletionRecord, DomainError> {
    let artifact: Option<String> = column(row, "artifact_ref")?;
    Ok(CompletionRecord {
        learner_id: learner_id(row)?,
        track_id: track_id(row)?,
        completed_at: timestamp(row, "completed_at")?,
        artifact: artifact
            .map(ArtifactReference::new)
            .transpose()
            .map_err(|e| db_error("decode artifact_ref", e))?,
    })
}

pub(super) fn row_to_collaborator_record(row: &PgRow) -> Result<CollaboratorRecord, DomainError> {
    let kind: String = column(row, "kind")?;
    Ok(CollaboratorRecord {
        kind: kind.parse().map_err(|e| db_error("decode kind", e))?,
        payload: column(row, "payload")?,
        created_at: timestamp(row, "created_at")?,
    })
}

pub(super) fn row_to_checkpoint(row: &PgRow) -> Result<Checkpoint, DomainError> {
    let id: uuid::Uuid = column(row, "id")?;
    Ok(Checkpoint {
        id: CheckpointId::from_uuid(id),
        learner_id: learner_id(row)?,
        name: column(row, "name")?,
        description: column(row, "description")?,
        created_at: timestamp(row, "created_at")?,
        data: json_column(row, "data")?,
    })
}
