//! Utility functions shared across cppdrill modules.

use std::fs;
use std::path::Path;

use crate::error::{DrillError, Result};

/// Maximum file size that can be read into memory (10 MB).
///
/// The store document and the problem catalog are both small JSON files;
/// anything above this limit is treated as an error rather than loaded.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10 MB

/// Read a file into a string with size limit protection.
///
/// # Errors
///
/// Returns an error if the file cannot be read or exceeds [`MAX_FILE_SIZE`].
pub fn read_to_string_limited(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| DrillError::storage(path, e))?;

    let size = metadata.len();
    if size > MAX_FILE_SIZE {
        return Err(DrillError::catalog(format!(
            "File {} is too large ({} bytes, max {} bytes)",
            path.display(),
            size,
            MAX_FILE_SIZE
        )));
    }

    fs::read_to_string(path).map_err(|e| DrillError::storage(path, e))
}

/// Format a number of seconds as `m:ss`.
///
/// Negative values clamp to `0:00`.
pub fn format_mmss(total_seconds: i64) -> String {
    let s = total_seconds.max(0);
    format!("{}:{:02}", s / 60, s % 60)
}

/// Check whether the filter `a` matches the tag list `b`.
///
/// An empty filter matches everything; otherwise at least one tag must be
/// shared.
pub fn intersects(a: &[String], b: &[String]) -> bool {
    if a.is_empty() {
        return true;
    }
    a.iter().any(|x| b.contains(x))
}
