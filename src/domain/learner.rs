//! Learner classification and aggregate progress.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{LearnerId, Percentage};

/// The slice of a learner account this service reads and restores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Learner {
    pub id: LearnerId,
    /// Test accounts have their data hard-deleted instead of tombstoned.
    pub is_test_learner: bool,
    pub progress: Percentage,
}

impl Learner {
    pub fn new(id: LearnerId, is_test_learner: bool) -> Self {
        Self {
            id,
            is_test_learner,
            progress: Percentage::ZERO,
        }
    }
}
