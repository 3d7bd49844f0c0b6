//! History port: Trait for persisting detection history.
//!
//! This trait abstracts the storage backend (SQLite) from the application logic.

use crate::domain::{HistoryRecord, HistoryStatus};

/// A page of history records with pagination metadata.
#[derive(Debug, Clone)]
pub struct HistoryPage {
    /// Records in this page
    pub items: Vec<HistoryRecord>,
    /// Total count of all records
    pub total_count: usize,
    /// Current page offset
    pub offset: usize,
    /// Page size limit
    pub limit: usize,
    /// Whether there are more pages
    pub has_more: bool,
}

impl HistoryPage {
    #[must_use]
    pub fn new(items: Vec<HistoryRecord>, total_count: usize, offset: usize, limit: usize) -> Self {
        let has_more = offset + items.len() < total_count;
        Self {
            items,
            total_count,
            offset,
            limit,
            has_more,
        }
    }

    /// Get the next page offset.
    #[must_use]
    pub fn next_offset(&self) -> Option<usize> {
        if self.has_more {
            Some(self.offset + self.limit)
        } else {
            None
        }
    }

    /// Get the previous page offset.
    #[must_use]
    pub fn prev_offset(&self) -> Option<usize> {
        if self.offset > 0 {
            Some(self.offset.saturating_sub(self.limit))
        } else {
            None
        }
    }
}

/// Trait for local history storage.
pub trait HistoryStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save a record.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn save_record(&self, record: &HistoryRecord) -> Result<(), Self::Error>;

    /// Load a single record by ID.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_record(&self, id: &str) -> Result<Option<HistoryRecord>, Self::Error>;

    /// Load the newest records (up to `limit`).
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, Self::Error>;

    /// Load records with offset pagination, newest first.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_paginated(&self, offset: usize, limit: usize) -> Result<HistoryPage, Self::Error>;

    /// Get the total count of records.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn count(&self) -> Result<usize, Self::Error>;

    /// Update the follow-up status of a record.
    ///
    /// # Errors
    /// Returns error if the record does not exist or storage fails.
    fn update_status(&self, id: &str, status: HistoryStatus) -> Result<(), Self::Error>;

    /// Delete a record by ID.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn delete_record(&self, id: &str) -> Result<(), Self::Error>;

    /// Delete every record.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn clear_all(&self) -> Result<(), Self::Error>;
}
