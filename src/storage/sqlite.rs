//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the MetricsStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{MetricsStore, StorageError, StorageResult};
use crate::storage::{LinkRecord, RunRecord};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const RUN_COLUMNS: &str = "id, website_name, download_start_date_time, download_end_date_time,
     total_elapsed_time, total_downloaded_kilobytes";

/// SQLite storage backend
///
/// Holds the single connection used for the lifetime of a run.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path` and ensures the schema exists
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
        Ok(RunRecord {
            id: row.get(0)?,
            website_name: row.get(1)?,
            started_at: row.get(2)?,
            finished_at: row.get(3)?,
            total_elapsed_ms: row.get(4)?,
            total_kilobytes: row.get(5)?,
        })
    }
}

impl MetricsStore for SqliteStorage {
    // ===== Run Management =====

    fn create_run(
        &mut self,
        target_name: &str,
        elapsed_ms: i64,
        kilobytes: i64,
    ) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let id: Option<i64> = self
            .conn
            .query_row(
                "INSERT INTO website
                 (website_name, download_start_date_time, download_end_date_time,
                  total_elapsed_time, total_downloaded_kilobytes)
                 VALUES (?1, ?2, ?2, ?3, ?4)
                 RETURNING id",
                params![target_name, now, elapsed_ms, kilobytes],
                |row| row.get(0),
            )
            .optional()?;

        id.ok_or(StorageError::MissingGeneratedKey("website"))
    }

    fn finalize_run(&mut self, run_id: i64) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE website
             SET download_end_date_time = ?1,
                 total_elapsed_time = COALESCE(
                     (SELECT SUM(total_elapsed_time) FROM link WHERE website_id = ?2), 0),
                 total_downloaded_kilobytes = COALESCE(
                     (SELECT SUM(total_downloaded_kilobytes) FROM link WHERE website_id = ?2), 0)
             WHERE id = ?2",
            params![now, run_id],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM website WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                Self::run_from_row,
            )
            .optional()?;

        run.ok_or(StorageError::RunNotFound(run_id))
    }

    fn list_runs(&self) -> StorageResult<Vec<RunRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM website ORDER BY id", RUN_COLUMNS))?;

        let runs = stmt
            .query_map([], Self::run_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(runs)
    }

    // ===== Link Management =====

    fn create_link(&mut self, url: &str, run_id: i64) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO link (link_name, website_id, total_elapsed_time, total_downloaded_kilobytes)
             VALUES (?1, ?2, 0, 0)",
            params![url, run_id],
        )?;
        Ok(())
    }

    fn update_link(
        &mut self,
        url: &str,
        run_id: i64,
        elapsed_ms: i64,
        kilobytes: i64,
    ) -> StorageResult<usize> {
        let updated = self.conn.execute(
            "UPDATE link
             SET total_elapsed_time = ?1, total_downloaded_kilobytes = ?2
             WHERE link_name = ?3 AND website_id = ?4",
            params![elapsed_ms, kilobytes, url, run_id],
        )?;
        Ok(updated)
    }

    fn get_links(&self, run_id: i64) -> StorageResult<Vec<LinkRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, link_name, website_id, total_elapsed_time, total_downloaded_kilobytes
             FROM link WHERE website_id = ?1 ORDER BY id",
        )?;

        let links = stmt
            .query_map(params![run_id], |row| {
                Ok(LinkRecord {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    run_id: row.get(2)?,
                    elapsed_ms: row.get(3)?,
                    kilobytes: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }
}
