//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Webclone database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per invocation against a target website
CREATE TABLE IF NOT EXISTS website (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    website_name TEXT NOT NULL,
    download_start_date_time TEXT,
    download_end_date_time TEXT,
    total_elapsed_time INTEGER NOT NULL DEFAULT 0,
    total_downloaded_kilobytes INTEGER NOT NULL DEFAULT 0
);

-- One row per distinct hyperlink discovered on the homepage
CREATE TABLE IF NOT EXISTS link (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    link_name TEXT NOT NULL,
    website_id INTEGER NOT NULL REFERENCES website(id),
    total_elapsed_time INTEGER NOT NULL DEFAULT 0,
    total_downloaded_kilobytes INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_link_website ON link(website_id);
CREATE INDEX IF NOT EXISTS idx_link_name ON link(link_name, website_id);
"#;

/// Initializes the database schema
///
/// Safe to call on an existing database; every statement is create-if-absent.
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
