//! GetStepHandler - Query handler for a single step payload.

use std::sync::Arc;

use super::resolve_key;
use crate::domain::foundation::LearnerId;
use crate::domain::step_data::{StepDataError, StepRecord};
use crate::domain::workshop::WorkshopCatalog;
use crate::ports::StepDataRepository;

/// Query for one step row.
#[derive(Debug, Clone)]
pub struct GetStepQuery {
    pub learner_id: LearnerId,
    pub track_id: String,
    pub step_id: String,
    /// Operators may read tombstoned rows.
    pub include_deleted: bool,
}

/// Handler for step lookups. Tombstoned rows are not found unless
/// `include_deleted` is set.
pub struct GetStepHandler {
    catalog: Arc<WorkshopCatalog>,
    steps: Arc<dyn StepDataRepository>,
}

impl GetStepHandler {
    pub fn new(catalog: Arc<WorkshopCatalog>, steps: Arc<dyn StepDataRepository>) -> Self {
        Self { catalog, steps }
    }

    pub async fn handle(&self, query: GetStepQuery) -> Result<StepRecord, StepDataError> {
        let key = resolve_key(&self.catalog, query.learner_id, &query.track_id, &query.step_id)?;

        match self.steps.find(&key).await? {
            Some(record) if query.include_deleted || !record.is_tombstoned() => Ok(record),
            _ => Err(StepDataError::not_found(key)),
        }
    }
}
