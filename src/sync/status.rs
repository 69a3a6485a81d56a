use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Counters for one completed pagination pass.
#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    pub pages_fetched: u64,
    pub records_upserted: u64,
    pub records_skipped: u64,
    pub upsert_failures: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// How the last sync run ended.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed(SyncSummary),
    Failed {
        error: String,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },
}

/// Run guard and last-run bookkeeping, shared between the controller
/// and the status endpoint.
#[derive(Default)]
pub struct SyncStatus {
    running: AtomicBool,
    last_run: Mutex<Option<RunOutcome>>,
}

impl SyncStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the run slot. Returns false when a run is already active;
    /// the caller must then drop the trigger.
    pub fn try_begin(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Record the outcome and release the run slot.
    pub fn finish(&self, outcome: RunOutcome) {
        *self.last_run.lock().unwrap() = Some(outcome);
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn last_run(&self) -> Option<RunOutcome> {
        self.last_run.lock().unwrap().clone()
    }
}
