use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info};

use scombz_core::config::TasksConfig;

/// Periodically republishes the current time so relative deadlines and
/// expiry filtering stay fresh while the list is on screen.
pub struct NowTicker {
    period: Duration,
}

impl NowTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
        }
    }

    pub fn from_config(config: &TasksConfig) -> Self {
        Self::new(Duration::from_secs(config.tick_secs))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Publish `Utc::now()` on `now_tx` every period until `shutdown` flips
    /// to true or every receiver is gone. The first tick fires immediately.
    pub async fn run(self, now_tx: watch::Sender<DateTime<Utc>>, mut shutdown: watch::Receiver<bool>) {
        info!(period_ms = self.period.as_millis() as u64, "now ticker started");
        let mut interval = tokio::time::interval(self.period);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let now = Utc::now();
                    if now_tx.send(now).is_err() {
                        debug!("no listeners left, stopping now ticker");
                        break;
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("now ticker shutting down");
                        break;
                    }
                }
            }
        }
    }
}
