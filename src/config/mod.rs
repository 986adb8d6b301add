//! Application configuration
//!
//! Configuration is read from environment variables with the
//! `WORKSHOP_PROGRESS` prefix; nested keys are separated by `__`.
//!
//! ```no_run
//! use workshop_progress::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod artifact;
mod auth;
mod cleanup;
mod database;
mod error;
mod server;
mod workshops;

pub use artifact::ArtifactConfig;
pub use auth::{AuthConfig, MIN_PRODUCTION_SECRET_LEN};
pub use cleanup::CleanupConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use workshops::WorkshopsConfig;

use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "WORKSHOP_PROGRESS";

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    #[serde(default)]
    pub artifact: ArtifactConfig,

    #[serde(default)]
    pub cleanup: CleanupConfig,

    #[serde(default)]
    pub workshops: WorkshopsConfig,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first when present.
    /// `WORKSHOP_PROGRESS__SERVER__PORT=8080` maps to `server.port`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.artifact.validate()?;
        self.cleanup.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Environment variables are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "WORKSHOP_PROGRESS__DATABASE__URL",
        "WORKSHOP_PROGRESS__AUTH__JWT_SECRET",
        "WORKSHOP_PROGRESS__SERVER__PORT",
        "WORKSHOP_PROGRESS__SERVER__ENVIRONMENT",
        "WORKSHOP_PROGRESS__CLEANUP__RETENTION_MONTHS",
        "WORKSHOP_PROGRESS__CLEANUP__ENABLED",
    ];

    fn set_minimal_env() {
        env::set_var(
            "WORKSHOP_PROGRESS__DATABASE__URL",
            "postgresql://test@localhost/test",
        );
        env::set_var("WORKSHOP_PROGRESS__AUTH__JWT_SECRET", "dev-secret");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn loads_minimal_environment_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.cleanup.retention_months, 6);
        assert!(config.artifact.endpoint.is_none());
        assert!(config.workshops.catalog_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_overrides_are_applied() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("WORKSHOP_PROGRESS__SERVER__PORT", "3000");
        env::set_var("WORKSHOP_PROGRESS__CLEANUP__RETENTION_MONTHS", "12");
        env::set_var("WORKSHOP_PROGRESS__CLEANUP__ENABLED", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cleanup.retention_months, 12);
        assert!(!config.cleanup.enabled);
    }

    #[test]
    fn production_rejects_short_jwt_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("WORKSHOP_PROGRESS__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::JwtSecretTooShort(MIN_PRODUCTION_SECRET_LEN))
        );
    }

    #[test]
    fn missing_database_url_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("WORKSHOP_PROGRESS__AUTH__JWT_SECRET", "dev-secret");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
