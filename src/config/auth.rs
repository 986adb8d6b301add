//! Bearer token verification settings

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;
use crate::adapters::auth::JwtConfig;

/// Minimum HS256 secret length accepted in production.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 signing secret
    pub jwt_secret: SecretString,

    /// Expected `iss` claim, if any
    pub issuer: Option<String>,

    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

impl AuthConfig {
    pub fn jwt_config(&self) -> JwtConfig {
        let config = JwtConfig::new(self.jwt_secret.clone()).with_leeway(self.leeway_secs);
        match &self.issuer {
            Some(issuer) => config.with_issuer(issuer.clone()),
            None => config,
        }
    }

    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.trim().is_empty() {
            return Err(ValidationError::MissingRequired("auth.jwt_secret"));
        }
        if *environment == Environment::Production && secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort(MIN_PRODUCTION_SECRET_LEN));
        }
        Ok(())
    }
}

fn default_leeway() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::new(secret.to_string()),
            issuer: None,
            leeway_secs: default_leeway(),
        }
    }

    #[test]
    fn short_secret_is_fine_outside_production() {
        assert!(config("dev-secret").validate(&Environment::Development).is_ok());
    }

    #[test]
    fn production_requires_long_secret() {
        assert_eq!(
            config("dev-secret").validate(&Environment::Production),
            Err(ValidationError::JwtSecretTooShort(MIN_PRODUCTION_SECRET_LEN))
        );
        let long = "x".repeat(MIN_PRODUCTION_SECRET_LEN);
        assert!(config(&long).validate(&Environment::Production).is_ok());
    }

    #[test]
    fn blank_secret_is_missing() {
        assert_eq!(
            config("   ").validate(&Environment::Development),
            Err(ValidationError::MissingRequired("auth.jwt_secret"))
        );
    }

    #[test]
    fn jwt_config_carries_issuer_and_leeway() {
        let mut cfg = config("dev-secret");
        cfg.issuer = Some("https://auth.example".to_string());
        cfg.leeway_secs = 5;

        let jwt = cfg.jwt_config();
        assert_eq!(jwt.issuer.as_deref(), Some("https://auth.example"));
        assert_eq!(jwt.leeway_secs, 5);
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", config("super-secret-value"));
        assert!(!rendered.contains("super-secret-value"));
    }
}
