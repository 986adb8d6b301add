//! A single track's workshop definition.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::{StepId, TrackId, ValidationError};

/// Versioned definition of one workshop track.
///
/// Required steps are data, not code: changing them means editing the
/// catalog document and bumping `version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkshopDefinition {
    pub id: TrackId,
    pub name: String,
    pub version: u32,

    /// Prefix shared by every step id of this track, used to infer the
    /// track from an update that does not name it.
    #[serde(default)]
    pub step_prefix: Option<String>,

    pub first_step: StepId,

    /// Steps that must all be completed before the track can be completed,
    /// in curriculum order.
    pub required_steps: Vec<StepId>,

    /// Synthetic step appended to `completedSteps` on completion.
    #[serde(default)]
    pub unlock_marker: Option<StepId>,

    /// Whether completing the track requests a summary artifact.
    #[serde(default)]
    pub generates_artifact: bool,
}

impl WorkshopDefinition {
    /// Returns the required steps absent from `completed`, in definition order.
    pub fn missing_steps(&self, completed: &[StepId]) -> Vec<StepId> {
        let done: HashSet<&StepId> = completed.iter().collect();
        self.required_steps
            .iter()
            .filter(|step| !done.contains(step))
            .cloned()
            .collect()
    }

    /// Returns true if a step id carries this track's prefix.
    pub fn owns_step(&self, step: &str) -> bool {
        match &self.step_prefix {
            Some(prefix) => step.starts_with(prefix.as_str()),
            None => false,
        }
    }

    /// Returns true if completing this track triggers side effects.
    pub fn has_completion_effects(&self) -> bool {
        self.unlock_marker.is_some() || self.generates_artifact
    }

    /// Checks internal consistency of the definition.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field(format!("tracks.{}.name", self.id)));
        }
        if self.version == 0 {
            return Err(ValidationError::out_of_range(
                format!("tracks.{}.version", self.id),
                1,
                i32::MAX,
                0,
            ));
        }
        if self.required_steps.is_empty() {
            return Err(ValidationError::empty_field(format!(
                "tracks.{}.required_steps",
                self.id
            )));
        }

        let mut seen = HashSet::new();
        for step in &self.required_steps {
            if !seen.insert(step) {
                return Err(ValidationError::invalid_format(
                    format!("tracks.{}.required_steps", self.id),
                    format!("duplicate step '{}'", step),
                ));
            }
        }

        if let Some(prefix) = &self.step_prefix {
            if prefix.is_empty() {
                return Err(ValidationError::empty_field(format!(
                    "tracks.{}.step_prefix",
                    self.id
                )));
            }
            let foreign = std::iter::once(&self.first_step)
                .chain(self.required_steps.iter())
                .find(|step| !step.has_prefix(prefix));
            if let Some(step) = foreign {
                return Err(ValidationError::invalid_format(
                    format!("tracks.{}.step_prefix", self.id),
                    format!("step '{}' does not start with '{}'", step, prefix),
                ));
            }
        }

        if let Some(marker) = &self.unlock_marker {
            if self.required_steps.contains(marker) {
                return Err(ValidationError::invalid_format(
                    format!("tracks.{}.unlock_marker", self.id),
                    "unlock marker cannot also be a required step",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn step(id: &str) -> StepId {
        StepId::new(id).unwrap()
    }

    pub fn steps(ids: &[&str]) -> Vec<StepId> {
        ids.iter().map(|id| step(id)).collect()
    }

    pub fn definition(id: &str, prefix: Option<&str>, required: &[&str]) -> WorkshopDefinition {
        WorkshopDefinition {
            id: TrackId::new(id).unwrap(),
            name: format!("Track {}", id),
            version: 1,
            step_prefix: prefix.map(str::to_string),
            first_step: step(required[0]),
            required_steps: steps(required),
            unlock_marker: None,
            generates_artifact: false,
        }
    }
}
