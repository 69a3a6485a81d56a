//! Feed synchronization
//!
//! A sync run is one complete pagination pass over the upstream feed,
//! from offset 0 to exhaustion. Runs are serialized by a run guard:
//! a trigger that arrives while a run is active is dropped, not queued.
//!
//! # Module Structure
//! - `controller`: the pagination/upsert state machine
//! - `scheduler`: startup + fixed-cadence triggering
//! - `status`: run guard and last-run bookkeeping

pub mod controller;
pub mod scheduler;
pub mod status;

pub use controller::SyncController;
pub use scheduler::SyncScheduler;
pub use status::{RunOutcome, SyncStatus, SyncSummary};
