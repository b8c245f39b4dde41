//! URL handling module for Webclone
//!
//! This module derives the run's target name from the operator's input,
//! turns link URLs into safe file names, and decides which links are
//! eligible for download.

mod domain;
mod sanitize;

// Re-export main functions
pub use domain::{strip_scheme, target_name};
pub use sanitize::{link_file_name, sanitize_file_name};

/// Returns true if the link uses a scheme the downloader fetches
///
/// Only `http://` and `https://` links are downloaded; everything else
/// (`mailto:`, `ftp:`, `javascript:` ...) is recorded but never fetched.
///
/// # Examples
///
/// ```
/// use webclone::url::is_downloadable;
///
/// assert!(is_downloadable("https://example.com/"));
/// assert!(!is_downloadable("mailto:someone@example.com"));
/// ```
pub fn is_downloadable(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
