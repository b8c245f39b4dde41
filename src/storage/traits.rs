//! Storage traits and error types
//!
//! This module defines the trait interface for metrics storage backends and
//! associated error types.

use crate::storage::{LinkRecord, RunRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Insert into {0} returned no generated id")]
    MissingGeneratedKey(&'static str),

    #[error("Run not found: {0}")]
    RunNotFound(i64),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for metrics storage backends
///
/// The pipeline receives a store through this trait and never reaches for a
/// connection on its own. Each call is a single statement; nothing spans a
/// transaction.
pub trait MetricsStore {
    // ===== Run Management =====

    /// Creates a run for `target_name`
    ///
    /// Start and end timestamps are both set to the current time, and the
    /// totals start out as the homepage's own measurements.
    ///
    /// # Returns
    ///
    /// The generated run ID, or `StorageError::MissingGeneratedKey` if the
    /// insert did not yield one
    fn create_run(
        &mut self,
        target_name: &str,
        elapsed_ms: i64,
        kilobytes: i64,
    ) -> StorageResult<i64>;

    /// Stamps the end time and replaces the run's totals with the sums over
    /// its links (0 when it has none)
    fn finalize_run(&mut self, run_id: i64) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets every run, oldest first
    fn list_runs(&self) -> StorageResult<Vec<RunRecord>>;

    // ===== Link Management =====

    /// Records a discovered link with zeroed metrics
    fn create_link(&mut self, url: &str, run_id: i64) -> StorageResult<()>;

    /// Sets the metrics of every link row matching `(url, run_id)`
    ///
    /// Rows are matched by value, not by ID.
    ///
    /// # Returns
    ///
    /// The number of rows updated
    fn update_link(
        &mut self,
        url: &str,
        run_id: i64,
        elapsed_ms: i64,
        kilobytes: i64,
    ) -> StorageResult<usize>;

    /// Gets the links of a run in discovery order
    fn get_links(&self, run_id: i64) -> StorageResult<Vec<LinkRecord>>;
}
