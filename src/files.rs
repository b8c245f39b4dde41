//! Snapshot file writer
//!
//! Persists downloaded content under the run directory. Every failure is
//! reported as `CloneError::StorageWrite` carrying the path involved.

use crate::CloneError;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed name the homepage is stored under
pub const HOMEPAGE_FILE_NAME: &str = "index.html";

/// Creates `dir` (and any missing parents) if it does not exist yet
pub fn ensure_dir(dir: &Path) -> Result<(), CloneError> {
    fs::create_dir_all(dir).map_err(|source| CloneError::StorageWrite {
        path: dir.to_path_buf(),
        source,
    })
}

/// Writes `bytes` to `base_dir/file_name`, replacing any existing file
///
/// `base_dir` is created first if it is missing.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(CloneError::StorageWrite)` - The directory or the file could not be written
pub fn write_file(base_dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, CloneError> {
    ensure_dir(base_dir)?;

    let path = base_dir.join(file_name);
    fs::write(&path, bytes).map_err(|source| CloneError::StorageWrite {
        path: path.clone(),
        source,
    })?;

    tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}
