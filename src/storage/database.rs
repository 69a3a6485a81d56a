//! Database connection and lifecycle management

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::schema::init_schema;

/// SQLite database wrapper shared across the sync and read paths.
pub struct Database {
    pub(super) conn: Arc<Mutex<Connection>>,
    db_path: String,
}

impl Database {
    /// Open (or create) the database and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        info!(path = %db_path, "Initializing database");

        if let Some(parent) = Path::new(db_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            info!(directory = %parent.display(), "Creating database directory");
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        debug!(path = %db_path, "Opening SQLite connection");
        let conn = Connection::open(db_path).context("Failed to open SQLite database")?;

        init_schema(&conn)?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: db_path.to_string(),
        };

        let (_, size_human) = db.get_db_size();
        let record_count = db.count_cves().unwrap_or(0);

        info!(
            path = %db_path,
            size = %size_human,
            records = record_count,
            "Database initialized successfully"
        );

        Ok(db)
    }

    /// Get database file size
    pub fn get_db_size(&self) -> (u64, String) {
        match std::fs::metadata(&self.db_path) {
            Ok(metadata) => {
                let size = metadata.len();
                (size, Self::format_bytes(size))
            }
            Err(_) => (0, "0 B".to_string()),
        }
    }

    /// Format bytes into human-readable string
    pub(super) fn format_bytes(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.2} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.2} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.2} KB", bytes as f64 / KB as f64)
        } else {
            format!("{} B", bytes)
        }
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            db_path: self.db_path.clone(),
        }
    }
}
