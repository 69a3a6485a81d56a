use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::sync::controller::SyncController;

/// Triggers sync runs: once at startup, then once per cadence tick.
///
/// Overlap protection lives in the controller's run guard, so a tick
/// firing while the previous run is still active is simply dropped.
pub struct SyncScheduler {
    controller: Arc<SyncController>,
    interval_secs: u64,
    sync_on_start: bool,
}

impl SyncScheduler {
    pub fn new(controller: Arc<SyncController>, interval_secs: u64, sync_on_start: bool) -> Self {
        Self {
            controller,
            interval_secs,
            sync_on_start,
        }
    }

    /// Run the trigger loop until the shutdown signal arrives.
    pub async fn run(&self, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        if self.sync_on_start {
            info!("Running initial sync");
            self.controller.run().await;
        }

        if self.interval_secs == 0 {
            debug!("Periodic sync disabled (interval_secs=0)");
            return;
        }

        let interval = Duration::from_secs(self.interval_secs);
        info!(
            interval_secs = self.interval_secs,
            "Starting periodic feed sync"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {
                    self.controller.run().await;
                }
                _ = shutdown.changed() => {
                    debug!("Sync scheduler shutting down");
                    break;
                }
            }
        }
    }
}
