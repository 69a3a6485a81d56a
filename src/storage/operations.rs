//! Upsert and query operations

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{ToSql, params};
use tracing::debug;

use super::database::Database;
use super::models::{CveRecord, Stats};
use super::query::CveFilter;

impl Database {
    /// Insert a record or replace all mutable fields of an existing one.
    ///
    /// A resync always supplies the full field set, so this never merges
    /// partially; a field that became empty upstream becomes empty here.
    pub fn upsert_cve(&self, record: &CveRecord) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            r#"
            INSERT INTO cves (cve_id, description, score, last_modified)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(cve_id) DO UPDATE SET
                description = excluded.description,
                score = excluded.score,
                last_modified = excluded.last_modified
            "#,
            params![
                record.cve_id,
                record.description,
                record.score,
                record.last_modified,
            ],
        )?;

        debug!(cve_id = %record.cve_id, "Record upserted");

        Ok(())
    }

    /// Query records matching the filter conjunction, in insertion order.
    pub fn query_cves(&self, filter: &CveFilter) -> Result<Vec<CveRecord>> {
        self.query_cves_at(filter, chrono::Utc::now().date_naive())
    }

    /// Like [`Database::query_cves`] with an explicit `today` anchor for
    /// the `since_days` cutoff.
    pub fn query_cves_at(&self, filter: &CveFilter, today: NaiveDate) -> Result<Vec<CveRecord>> {
        let conn = self.conn.lock().unwrap();

        let constraints = filter.constraints(today);

        let mut sql =
            String::from("SELECT cve_id, description, score, last_modified FROM cves");
        let mut sql_params: Vec<Box<dyn ToSql>> = Vec::new();

        for (i, constraint) in constraints.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(constraint.sql());
            sql_params.push(constraint.param());
        }

        sql.push_str(" ORDER BY id");

        let params_refs: Vec<&dyn ToSql> = sql_params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_refs.as_slice(), |row| {
            Ok(CveRecord {
                cve_id: row.get(0)?,
                description: row.get(1)?,
                score: row.get(2)?,
                last_modified: row.get(3)?,
            })
        })?;

        let results: Result<Vec<_>, _> = rows.collect();
        Ok(results?)
    }

    /// Total stored record count
    pub fn count_cves(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM cves", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get overall statistics
    pub fn get_stats(&self) -> Result<Stats> {
        let total_cves = self.count_cves()?;
        let (db_size_bytes, db_size_human) = self.get_db_size();

        let conn = self.conn.lock().unwrap();
        let sqlite_version: String = conn
            .query_row("SELECT sqlite_version()", [], |row| row.get(0))
            .unwrap_or_else(|_| "unknown".to_string());

        Ok(Stats {
            total_cves,
            db_size_bytes,
            db_size_human,
            sqlite_version,
        })
    }
}
