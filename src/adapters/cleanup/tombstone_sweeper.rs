//! TombstoneSweeper - Background service that reclaims old tombstones.
//!
//! Runs the reclaim on a fixed interval until the shutdown channel flips
//! to `true`. A failed pass is logged and retried on the next tick.
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 24h | Time between passes |
//! | `retention_months` | 6 | Calendar months a tombstone is kept |

use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::application::handlers::cleanup::{
    ReclaimTombstonesCommand, ReclaimTombstonesHandler, DEFAULT_RETENTION_MONTHS,
};
use crate::domain::step_data::ReclaimOutcome;

/// Configuration for the TombstoneSweeper service.
#[derive(Debug, Clone)]
pub struct TombstoneSweeperConfig {
    pub interval: Duration,
    pub retention_months: u32,
}

impl Default for TombstoneSweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(24 * 60 * 60),
            retention_months: DEFAULT_RETENTION_MONTHS,
        }
    }
}

impl TombstoneSweeperConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_retention_months(mut self, months: u32) -> Self {
        self.retention_months = months;
        self
    }
}

pub struct TombstoneSweeper {
    handler: ReclaimTombstonesHandler,
    config: TombstoneSweeperConfig,
}

impl TombstoneSweeper {
    pub fn new(handler: ReclaimTombstonesHandler, config: TombstoneSweeperConfig) -> Self {
        Self { handler, config }
    }

    /// Run the sweep loop until shutdown signal is received.
    ///
    /// The first pass runs immediately.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);

        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            retention_months = self.config.retention_months,
            "Tombstone sweeper started"
        );

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Tombstone sweeper stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// Run exactly one reclaim pass.
    pub async fn sweep_once(&self) -> ReclaimOutcome {
        self.handler
            .handle(ReclaimTombstonesCommand {
                retention_months: Some(self.config.retention_months),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryWorkshopStore;
    use crate::domain::foundation::{LearnerId, StepId, Timestamp, TrackId};
    use crate::domain::step_data::{StepKey, StepRecord};
    use serde_json::json;
    use std::sync::Arc;

    fn old_tombstone(step: &str) -> StepRecord {
        let key = StepKey::new(
            LearnerId::new(1).unwrap(),
            TrackId::new("ast").unwrap(),
            StepId::new(step).unwrap(),
        );
        let created = Timestamp::now().minus_days(500);
        let mut record = StepRecord::new(key, json!({}), created);
        record.tombstone(Timestamp::now().minus_days(400));
        record
    }

    fn sweeper(store: Arc<InMemoryWorkshopStore>, interval: Duration) -> TombstoneSweeper {
        TombstoneSweeper::new(
            ReclaimTombstonesHandler::new(store),
            TombstoneSweeperConfig::default().with_interval(interval),
        )
    }

    #[test]
    fn config_builders_override_defaults() {
        let config = TombstoneSweeperConfig::default()
            .with_interval(Duration::from_secs(60))
            .with_retention_months(12);
        assert_eq!(config.interval, Duration::from_secs(60));
        assert_eq!(config.retention_months, 12);
        assert_eq!(TombstoneSweeperConfig::default().retention_months, 6);
    }

    #[tokio::test]
    async fn sweep_once_reclaims_expired_rows() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        store.insert_step_record(old_tombstone("1-1")).await;

        let outcome = sweeper(store.clone(), Duration::from_secs(60)).sweep_once().await;

        assert_eq!(outcome, ReclaimOutcome::Reclaimed { count: 1 });
        assert_eq!(store.step_row_count().await, 0);
    }

    #[tokio::test]
    async fn run_sweeps_and_stops_on_shutdown_signal() {
        let store = Arc::new(InMemoryWorkshopStore::new());
        store.insert_step_record(old_tombstone("1-1")).await;
        let sweeper = sweeper(store.clone(), Duration::from_millis(10));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            sweeper.run(shutdown_rx).await;
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(store.step_row_count().await, 0);
    }
}
