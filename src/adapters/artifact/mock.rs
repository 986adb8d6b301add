//! Mock artifact generator for tests and local development.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::completion::ArtifactReference;
use crate::domain::foundation::{DomainError, LearnerId, TrackId};
use crate::ports::{artifact_failed, ArtifactGenerator};

/// Returns a deterministic reference, or fails on demand.
#[derive(Debug, Default)]
pub struct MockArtifactGenerator {
    fail_with: Option<String>,
    calls: Mutex<Vec<(LearnerId, TrackId)>>,
}

impl MockArtifactGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator whose every call fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<(LearnerId, TrackId)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ArtifactGenerator for MockArtifactGenerator {
    async fn generate(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
    ) -> Result<ArtifactReference, DomainError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((learner_id, track_id.clone()));
        }
        if let Some(reason) = &self.fail_with {
            return Err(artifact_failed(reason.clone()));
        }
        ArtifactReference::new(format!("artifacts/{}/{}.png", learner_id, track_id))
            .map_err(DomainError::from)
    }
}
