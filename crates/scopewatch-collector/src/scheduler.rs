//! Refresh scheduler.
//!
//! Two phases. [`Scheduler::bootstrap`] runs one cycle synchronously at
//! startup; its failure is fatal to the process, because there is no
//! meaningful initial snapshot to serve. [`Scheduler::run`] then
//! repeats the cycle for the process lifetime, publishing each
//! successful result and shortening the sleep after a failed cycle so
//! a transient upstream outage does not stall refresh for a whole
//! period. The watch channel makes every suspension point cancellable.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use crate::cycle::{Collector, CycleError};
use crate::store::SnapshotStore;

/// Delay before retrying after a failed cycle in steady state.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Drives collection cycles and publishes their results.
pub struct Scheduler {
    collector: Collector,
    store: Arc<SnapshotStore>,
    period: Duration,
    retry_delay: Duration,
}

impl Scheduler {
    pub fn new(collector: Collector, store: Arc<SnapshotStore>, period: Duration) -> Self {
        Self {
            collector,
            store,
            period,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Override the post-failure retry delay (used by tests).
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// The starting phase: one synchronous cycle, published on success.
    ///
    /// An error here means the process cannot serve a meaningful
    /// initial snapshot; the caller exits non-zero.
    pub async fn bootstrap(&self) -> Result<(), CycleError> {
        info!("running initial collection cycle");
        let metrics = self.collector.run_cycle().await?;
        let cycle = self.store.publish(metrics);
        info!(cycle, "initial snapshot published");
        Ok(())
    }

    /// The steady phase: cycle on the configured period until shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            period_secs = self.period.as_secs(),
            "scheduler entering steady state"
        );

        let mut delay = self.period;
        loop {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    match self.collector.run_cycle().await {
                        Ok(metrics) => {
                            let cycle = self.store.publish(metrics);
                            info!(cycle, "snapshot published");
                            delay = self.period;
                        }
                        Err(e) => {
                            // Keep serving the last good snapshot and
                            // come back sooner than the full period.
                            error!(error = %e, retry_secs = self.retry_delay.as_secs(),
                                "collection cycle failed, will retry");
                            delay = self.retry_delay;
                        }
                    }
                }
                _ = shutdown.changed() => {
                    info!("scheduler shutting down");
                    break;
                }
            }
        }
    }
}
