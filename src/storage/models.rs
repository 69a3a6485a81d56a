//! Data models for the storage layer

use serde::{Deserialize, Serialize};

/// Canonical locally-stored representation of one vulnerability entry.
///
/// `cve_id` is the business key; the remaining fields are replaced
/// wholesale on every resync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CveRecord {
    /// Business key, e.g. "CVE-2024-1234"
    pub cve_id: String,
    /// First upstream description, empty when none was present
    pub description: String,
    /// CVSS base score, absent when upstream reports no severity metric
    pub score: Option<f64>,
    /// Upstream last-modified timestamp, ISO-8601-date-prefixed
    pub last_modified: String,
}

/// Overall statistics
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    /// Total stored records
    pub total_cves: i64,
    /// Database size in bytes
    pub db_size_bytes: u64,
    /// Human-readable database size
    pub db_size_human: String,
    /// SQLite version
    pub sqlite_version: String,
}
