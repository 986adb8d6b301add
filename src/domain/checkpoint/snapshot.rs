//! Checkpoint snapshots of a learner's complete workshop state.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::domain::completion::CompletionRecord;
use crate::domain::foundation::{CheckpointId, LearnerId, Percentage, Timestamp, ValidationError};
use crate::domain::progress::NavigationProgress;
use crate::domain::step_data::StepRecord;

/// Maximum checkpoint name length in characters.
pub const MAX_CHECKPOINT_NAME_LEN: usize = 100;

/// Maximum checkpoint description length in characters.
pub const MAX_CHECKPOINT_DESCRIPTION_LEN: usize = 1000;

/// Kinds of collaborator-owned records a checkpoint captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Assessment,
    DiscernmentProgress,
    FinalReflection,
    GrowthPlan,
    WorkshopParticipation,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Assessment => "assessment",
            RecordKind::DiscernmentProgress => "discernment_progress",
            RecordKind::FinalReflection => "final_reflection",
            RecordKind::GrowthPlan => "growth_plan",
            RecordKind::WorkshopParticipation => "workshop_participation",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assessment" => Ok(RecordKind::Assessment),
            "discernment_progress" => Ok(RecordKind::DiscernmentProgress),
            "final_reflection" => Ok(RecordKind::FinalReflection),
            "growth_plan" => Ok(RecordKind::GrowthPlan),
            "workshop_participation" => Ok(RecordKind::WorkshopParticipation),
            other => Err(ValidationError::invalid_format(
                "record_kind",
                format!("unknown record kind '{}'", other),
            )),
        }
    }
}

/// A record owned by another part of the platform, captured verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorRecord {
    pub kind: RecordKind,
    pub payload: Value,
    pub created_at: Timestamp,
}

/// Everything a checkpoint restores.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointData {
    pub navigation_progress: Vec<NavigationProgress>,
    /// Step rows including tombstones.
    pub step_data: Vec<StepRecord>,
    pub collaborator_records: Vec<CollaboratorRecord>,
    #[serde(default)]
    pub completions: Vec<CompletionRecord>,
    pub learner_progress: Percentage,
}

impl CheckpointData {
    /// Returns true if nothing was captured besides the percentage.
    pub fn is_empty(&self) -> bool {
        self.navigation_progress.is_empty()
            && self.step_data.is_empty()
            && self.collaborator_records.is_empty()
            && self.completions.is_empty()
    }
}

/// A named snapshot of a learner's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub id: CheckpointId,
    pub learner_id: LearnerId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub data: CheckpointData,
}

impl Checkpoint {
    /// Creates a checkpoint, validating name and description.
    pub fn new(
        learner_id: LearnerId,
        name: &str,
        description: Option<&str>,
        data: CheckpointData,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: CheckpointId::new(),
            learner_id,
            name: validate_name(name)?,
            description: validate_description(description)?,
            created_at: now,
            data,
        })
    }

    pub fn belongs_to(&self, learner_id: LearnerId) -> bool {
        self.learner_id == learner_id
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    let len = name.chars().count();
    if len > MAX_CHECKPOINT_NAME_LEN {
        return Err(ValidationError::out_of_range(
            "name",
            1,
            MAX_CHECKPOINT_NAME_LEN as i32,
            len as i32,
        ));
    }
    Ok(name.to_string())
}

fn validate_description(description: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    let len = description.chars().count();
    if len > MAX_CHECKPOINT_DESCRIPTION_LEN {
        return Err(ValidationError::out_of_range(
            "description",
            0,
            MAX_CHECKPOINT_DESCRIPTION_LEN as i32,
            len as i32,
        ));
    }
    Ok(Some(description.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn learner() -> LearnerId {
        LearnerId::new(9).unwrap()
    }

    #[test]
    fn new_trims_and_accepts_valid_name() {
        let cp = Checkpoint::new(
            learner(),
            "  Before module 3  ",
            Some("   "),
            CheckpointData::default(),
            Timestamp::now(),
        )
        .unwrap();
        assert_eq!(cp.name, "Before module 3");
        assert_eq!(cp.description, None);
        assert!(cp.belongs_to(learner()));
        assert!(!cp.belongs_to(LearnerId::new(10).unwrap()));
    }

    #[test]
    fn new_rejects_blank_name() {
        let result = Checkpoint::new(learner(), "   ", None, CheckpointData::default(), Timestamp::now());
        assert_eq!(result.unwrap_err(), ValidationError::empty_field("name"));
    }

    #[test]
    fn new_rejects_long_name() {
        let name = "x".repeat(MAX_CHECKPOINT_NAME_LEN + 1);
        let result = Checkpoint::new(learner(), &name, None, CheckpointData::default(), Timestamp::now());
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn name_at_limit_is_accepted() {
        let name = "é".repeat(MAX_CHECKPOINT_NAME_LEN);
        assert!(Checkpoint::new(learner(), &name, None, CheckpointData::default(), Timestamp::now()).is_ok());
    }

    #[test]
    fn record_kind_round_trips_through_str() {
        for kind in [
            RecordKind::Assessment,
            RecordKind::DiscernmentProgress,
            RecordKind::FinalReflection,
            RecordKind::GrowthPlan,
            RecordKind::WorkshopParticipation,
        ] {
            assert_eq!(kind.as_str().parse::<RecordKind>().unwrap(), kind);
        }
        assert!("checkpoint".parse::<RecordKind>().is_err());
    }

    #[test]
    fn data_serializes_with_camel_case() {
        let data = CheckpointData {
            collaborator_records: vec![CollaboratorRecord {
                kind: RecordKind::GrowthPlan,
                payload: json!({"quarter": "Q1"}),
                created_at: Timestamp::now(),
            }],
            learner_progress: Percentage::new(40),
            ..Default::default()
        };
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["learnerProgress"], 40);
        assert_eq!(value["collaboratorRecords"][0]["kind"], "growth_plan");
        assert!(!data.is_empty());
    }
}
