//! Configuration module for Webclone
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use webclone::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webclone.toml")).unwrap();
//! println!("Links time out after {}ms", config.fetcher.download_timeout_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, OutputConfig};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
