//! Storage layer
//!
//! SQLite-based persistence for CVE records, keyed by the `cve_id`
//! business key with full-field-replace upsert semantics.
//!
//! # Module Structure
//! - `database`: connection and lifecycle management
//! - `models`: data types
//! - `schema`: schema initialization
//! - `query`: typed filter constraints
//! - `operations`: upsert and query operations

mod database;
pub mod models;
mod operations;
pub mod query;
mod schema;

use anyhow::Result;

pub use database::Database;
pub use models::{CveRecord, Stats};
pub use query::CveFilter;

/// Write seam between the sync controller and the persistence engine.
///
/// The controller only ever upserts; reads go through [`Database`]
/// directly. Keeping the seam narrow lets controller tests substitute
/// an in-memory store.
pub trait CveStore: Send + Sync {
    /// Insert the record or replace all mutable fields of an existing
    /// one with the same `cve_id`.
    fn upsert_cve(&self, record: &CveRecord) -> Result<()>;
}

impl CveStore for Database {
    fn upsert_cve(&self, record: &CveRecord) -> Result<()> {
        Database::upsert_cve(self, record)
    }
}
