//! Webclone: a one-shot website snapshot tool
//!
//! This crate fetches a single web page, downloads every reachable page it
//! links to, and records elapsed time and downloaded size for the page and
//! each link in a SQLite database.

pub mod config;
pub mod crawler;
pub mod files;
pub mod output;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Webclone operations
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Failed to write {}: {source}", .path.display())]
    StorageWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Persistence error: {0}")]
    Persistence(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CloneError {
    /// Classifies a reqwest failure for `url` as a timeout or a fetch error
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Fetch {
                url: url.to_string(),
                source,
            }
        }
    }

    /// Returns true if this error is a bounded-timeout expiry
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("No host segment in '{0}'")]
    MissingHost(String),
}

/// Result type alias for Webclone operations
pub type Result<T> = std::result::Result<T, CloneError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Pipeline, PipelineFailure, RunReport, Stage};
pub use storage::{MetricsStore, SqliteStorage};
pub use crate::url::{sanitize_file_name, target_name};
