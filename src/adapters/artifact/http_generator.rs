//! HTTP artifact generator.
//!
//! POSTs `{ "learnerId", "trackId" }` to the configured endpoint with a
//! bearer key and expects `{ "reference": "..." }` back.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::completion::ArtifactReference;
use crate::domain::foundation::{DomainError, LearnerId, TrackId};
use crate::ports::{artifact_failed, ArtifactGenerator};

/// Configuration for the HTTP artifact generator.
#[derive(Debug, Clone)]
pub struct HttpArtifactConfig {
    pub endpoint: String,
    api_key: SecretString,
    pub timeout: Duration,
}

impl HttpArtifactConfig {
    pub fn new(endpoint: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    learner_id: i64,
    track_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    reference: String,
}

/// Artifact generator backed by an HTTP service.
pub struct HttpArtifactGenerator {
    config: HttpArtifactConfig,
    client: Client,
}

impl HttpArtifactGenerator {
    /// Creates a generator, building a client with the configured timeout.
    pub fn new(config: HttpArtifactConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| artifact_failed(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl ArtifactGenerator for HttpArtifactGenerator {
    async fn generate(
        &self,
        learner_id: LearnerId,
        track_id: &TrackId,
    ) -> Result<ArtifactReference, DomainError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&GenerateRequest {
                learner_id: learner_id.value(),
                track_id: track_id.as_str(),
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    artifact_failed("Artifact service timed out")
                } else {
                    artifact_failed(format!("Artifact service unreachable: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(artifact_failed(format!(
                "Artifact service returned {}: {}",
                status, body
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| artifact_failed(format!("Invalid artifact service response: {}", e)))?;

        ArtifactReference::new(body.reference)
            .map_err(|e| artifact_failed(format!("Invalid artifact reference: {}", e)))
    }
}
