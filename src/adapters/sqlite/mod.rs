//! SQLite adapter: Implementation of HistoryStore.
//!
//! Provides local persistence for detection history.
//!
//! # Mutex Behavior
//!
//! The connection is protected by a `Mutex`. A poisoned mutex (from a panic in
//! another thread) is reported as `StorageError::LockPoisoned` and the
//! operation is not attempted.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, Row};

use crate::domain::{HistoryRecord, HistoryStatus};
use crate::ports::{HistoryPage, HistoryStore};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

const SELECT_COLUMNS: &str = "SELECT id, disease, display_name, confidence, processing_time_ms, \
     image_digest, status, created_at FROM history";

/// SQLite history store.
pub struct SqliteHistory {
    conn: Mutex<Connection>,
}

impl SqliteHistory {
    /// Open (or create) a history database at the given path.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Create an in-memory SQLite database (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.lock()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS history (
                id TEXT PRIMARY KEY,
                disease TEXT NOT NULL,
                display_name TEXT NOT NULL,
                confidence REAL NOT NULL,
                processing_time_ms INTEGER NOT NULL,
                image_digest TEXT,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_history_created
                ON history(created_at DESC);
            ",
        )?;

        Ok(())
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<HistoryRecord> {
        let confidence: f64 = row.get(3)?;
        let processing_time_ms: i64 = row.get(4)?;
        let status_str: String = row.get(6)?;
        let created_at_str: String = row.get(7)?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .unwrap_or_else(|_| chrono::Utc::now());

        Ok(HistoryRecord {
            id: row.get(0)?,
            disease: row.get(1)?,
            display_name: row.get(2)?,
            confidence: confidence as f32,
            processing_time_ms: u64::try_from(processing_time_ms).unwrap_or(0),
            image_digest: row.get(5)?,
            status: status_str.parse().unwrap_or(HistoryStatus::Ongoing),
            created_at,
        })
    }

    fn query_records(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<HistoryRecord>, StorageError> {
        let mut stmt = conn.prepare(sql)?;
        let records = stmt
            .query_map(params, Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

impl HistoryStore for SqliteHistory {
    type Error = StorageError;

    fn save_record(&self, record: &HistoryRecord) -> Result<(), Self::Error> {
        let conn = self.lock()?;

        conn.execute(
            r"
            INSERT INTO history (
                id, disease, display_name, confidence, processing_time_ms,
                image_digest, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
            params![
                record.id,
                record.disease,
                record.display_name,
                f64::from(record.confidence),
                i64::try_from(record.processing_time_ms).unwrap_or(i64::MAX),
                record.image_digest,
                record.status.as_str(),
                // Fixed precision keeps text order equal to time order.
                record
                    .created_at
                    .to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            ],
        )?;

        tracing::debug!("Saved history record {}", record.id);
        Ok(())
    }

    fn load_record(&self, id: &str) -> Result<Option<HistoryRecord>, Self::Error> {
        let conn = self.lock()?;
        let mut records =
            Self::query_records(&conn, &format!("{SELECT_COLUMNS} WHERE id = ?1"), params![id])?;
        Ok(records.pop())
    }

    fn load_recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, Self::Error> {
        let conn = self.lock()?;
        Self::query_records(
            &conn,
            &format!("{SELECT_COLUMNS} ORDER BY created_at DESC LIMIT ?1"),
            params![limit as i64],
        )
    }

    fn load_paginated(&self, offset: usize, limit: usize) -> Result<HistoryPage, Self::Error> {
        let conn = self.lock()?;

        let total_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;

        let items = Self::query_records(
            &conn,
            &format!("{SELECT_COLUMNS} ORDER BY created_at DESC LIMIT ?1 OFFSET ?2"),
            params![limit as i64, offset as i64],
        )?;

        Ok(HistoryPage::new(items, total_count as usize, offset, limit))
    }

    fn count(&self) -> Result<usize, Self::Error> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn update_status(&self, id: &str, status: HistoryStatus) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE history SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete_record(&self, id: &str) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM history WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn clear_all(&self) -> Result<(), Self::Error> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM history", [])?;
        tracing::warn!("Cleared all history records");
        Ok(())
    }
}
