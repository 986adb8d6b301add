//! Step data command and query handlers.

mod delete_learner_steps;
mod get_step;
mod list_learner_steps;
mod list_steps;
mod upsert_step;

pub use delete_learner_steps::{DeleteLearnerStepsCommand, DeleteLearnerStepsHandler};
pub use get_step::{GetStepHandler, GetStepQuery};
pub use list_learner_steps::{ListLearnerStepsHandler, ListLearnerStepsQuery};
pub use list_steps::{ListStepsHandler, ListStepsQuery};
pub use upsert_step::{UpsertStepCommand, UpsertStepHandler};

use crate::domain::foundation::{LearnerId, StepId, TrackId};
use crate::domain::step_data::{StepDataError, StepKey};
use crate::domain::workshop::WorkshopCatalog;

/// Resolves a catalog track from a raw client identifier.
fn resolve_track(catalog: &WorkshopCatalog, raw: &str) -> Result<TrackId, StepDataError> {
    catalog
        .lookup(raw)
        .map(|definition| definition.id.clone())
        .ok_or_else(|| StepDataError::UnknownTrack(raw.to_string()))
}

/// Builds the composite key for a step request.
fn resolve_key(
    catalog: &WorkshopCatalog,
    learner_id: LearnerId,
    raw_track: &str,
    raw_step: &str,
) -> Result<StepKey, StepDataError> {
    let track_id = resolve_track(catalog, raw_track)?;
    let step_id = StepId::new(raw_step)?;
    Ok(StepKey::new(learner_id, track_id, step_id))
}
