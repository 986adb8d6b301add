//! Completion artifact service settings

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::artifact::HttpArtifactConfig;

/// Without an endpoint the service runs with the in-process mock generator.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    pub endpoint: Option<String>,

    pub api_key: Option<SecretString>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ArtifactConfig {
    /// HTTP generator settings, or `None` when no endpoint is configured.
    pub fn http_config(&self) -> Option<HttpArtifactConfig> {
        let endpoint = self.endpoint.as_ref()?;
        let api_key = self.api_key.clone()?;
        Some(
            HttpArtifactConfig::new(endpoint.clone(), api_key)
                .with_timeout(Duration::from_secs(self.timeout_secs)),
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ValidationError::InvalidArtifactEndpoint);
            }
            if self.api_key.is_none() {
                return Err(ValidationError::MissingRequired("artifact.api_key"));
            }
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
