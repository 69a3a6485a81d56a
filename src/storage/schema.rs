//! Database schema initialization

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{debug, info};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    debug!("Initializing database schema");

    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='cves'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);

    if table_exists {
        debug!("Records table already exists");
    } else {
        info!("Creating new database schema");
    }

    conn.execute_batch(
        r#"
        -- CVE records, keyed by the cve_id business key
        CREATE TABLE IF NOT EXISTS cves (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cve_id TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            score REAL,
            last_modified TEXT NOT NULL DEFAULT ''
        );

        -- Indexes for common filters
        CREATE INDEX IF NOT EXISTS idx_cves_last_modified ON cves(last_modified);
        CREATE INDEX IF NOT EXISTS idx_cves_score ON cves(score);
        "#,
    )
    .context("Failed to initialize database schema")?;

    debug!(table = "cves", "Database schema initialized");

    Ok(())
}
