//! Storage module for persisting run metrics
//!
//! This module handles all database operations for Webclone, including:
//! - SQLite database initialization and schema management
//! - Website run creation and finalization
//! - Per-link metric rows

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStorage;
pub use traits::{MetricsStore, StorageError, StorageResult};

use std::path::Path;

/// Opens a storage database, creating the schema if absent
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// Represents a website run in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    pub id: i64,
    pub website_name: String,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
    pub total_elapsed_ms: i64,
    pub total_kilobytes: i64,
}

/// Represents a discovered link in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub id: i64,
    pub url: String,
    pub run_id: i64,
    pub elapsed_ms: i64,
    pub kilobytes: i64,
}

impl LinkRecord {
    /// Returns true if non-zero metrics were recorded for this link
    ///
    /// A download under 1 KiB that finishes within a millisecond records
    /// 0/0 too, so this undercounts completed downloads.
    pub fn has_metrics(&self) -> bool {
        self.elapsed_ms > 0 || self.kilobytes > 0
    }
}
