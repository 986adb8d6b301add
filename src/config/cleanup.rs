//! Tombstone reclamation schedule

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::cleanup::TombstoneSweeperConfig;
use crate::application::handlers::cleanup::{DEFAULT_RETENTION_MONTHS, MAX_RETENTION_MONTHS};

const MIN_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct CleanupConfig {
    /// Run the background sweeper
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_retention_months")]
    pub retention_months: u32,

    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

impl CleanupConfig {
    pub fn sweeper_config(&self) -> TombstoneSweeperConfig {
        TombstoneSweeperConfig::default()
            .with_interval(Duration::from_secs(self.interval_secs))
            .with_retention_months(self.retention_months)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.retention_months == 0 || self.retention_months > MAX_RETENTION_MONTHS {
            return Err(ValidationError::InvalidRetention);
        }
        if self.interval_secs < MIN_INTERVAL_SECS {
            return Err(ValidationError::CleanupIntervalTooShort(MIN_INTERVAL_SECS));
        }
        Ok(())
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            retention_months: default_retention_months(),
            interval_secs: default_interval(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_retention_months() -> u32 {
    DEFAULT_RETENTION_MONTHS
}

fn default_interval() -> u64 {
    24 * 60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sweep_daily_with_six_month_retention() {
        let config = CleanupConfig::default();
        assert!(config.enabled);
        assert!(config.validate().is_ok());

        let sweeper = config.sweeper_config();
        assert_eq!(sweeper.interval, Duration::from_secs(86_400));
        assert_eq!(sweeper.retention_months, 6);
    }

    #[test]
    fn zero_retention_is_rejected() {
        let config = CleanupConfig {
            retention_months: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRetention));
    }

    #[test]
    fn retention_beyond_cap_is_rejected() {
        let config = CleanupConfig {
            retention_months: MAX_RETENTION_MONTHS + 1,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRetention));
    }

    #[test]
    fn interval_has_a_floor() {
        let config = CleanupConfig {
            interval_secs: 5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::CleanupIntervalTooShort(60))
        );
    }
}
