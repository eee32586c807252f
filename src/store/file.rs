//! File-based storage backend.
//!
//! The store document lives as one JSON file (by default
//! `~/.cppdrill/training-store.json`). Writes are atomic via the temp file +
//! rename pattern, so a crash mid-write leaves the previous document intact.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::config::store_path;
use crate::error::{DrillError, Result};
use crate::store::StorageBackend;

/// File-backed storage for the training store document.
#[derive(Debug, Clone)]
pub struct FileBackend {
    /// Path of the document file.
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend at the default location.
    ///
    /// Uses `~/.cppdrill/training-store.json` or
    /// `$CPPDRILL_HOME/training-store.json`.
    pub fn new() -> Result<Self> {
        let path = store_path().ok_or_else(|| {
            DrillError::config("Could not determine store path (no home directory)")
        })?;
        Self::with_path(path)
    }

    /// Create a backend at a custom path.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| DrillError::storage(parent, e))?;
            }
        }

        Ok(Self { path })
    }

    /// Path of the document file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Path of the temp file used during atomic writes.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "training-store.json".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| DrillError::storage(&self.path, e))?;
        Ok(Some(content))
    }

    fn write(&self, payload: &str) -> Result<()> {
        let temp_path = self.temp_path();

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| DrillError::storage(&temp_path, e))?;
            file.write_all(payload.as_bytes())
                .map_err(|e| DrillError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| DrillError::storage(&temp_path, e))?;
        }

        // Atomic on POSIX.
        fs::rename(&temp_path, &self.path).map_err(|e| DrillError::storage(&self.path, e))?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| DrillError::storage(&self.path, e))?;
        }

        let temp_path = self.temp_path();
        if temp_path.exists() {
            let _ = fs::remove_file(&temp_path);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::traits::tests::test_backend_contract;
    use tempfile::TempDir;

    fn create_test_backend() -> (FileBackend, TempDir) {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::with_path(dir.path().join("training-store.json")).unwrap();
        (backend, dir)
    }

    #[test]
    fn test_file_backend_contract() {
        let (backend, _dir) = create_test_backend();
        test_backend_contract(&backend);
    }

    #[test]
    fn test_with_path_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("training-store.json");

        assert!(!nested.parent().unwrap().exists());

        let _backend = FileBackend::with_path(&nested).unwrap();

        assert!(nested.parent().unwrap().exists());
    }

    #[test]
    fn test_write_then_read() {
        let (backend, _dir) = create_test_backend();

        backend.write("{\"version\":1}").unwrap();
        assert_eq!(backend.read().unwrap().as_deref(), Some("{\"version\":1}"));
    }

    #[test]
    fn test_temp_file_cleaned_up_after_write() {
        let (backend, _dir) = create_test_backend();

        backend.write("{}").unwrap();
        assert!(!backend.temp_path().exists());
    }

    #[test]
    fn test_read_missing_returns_none() {
        let (backend, _dir) = create_test_backend();
        assert!(backend.read().unwrap().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (backend, _dir) = create_test_backend();

        backend.write("{}").unwrap();
        backend.clear().unwrap();
        backend.clear().unwrap();

        assert!(backend.read().unwrap().is_none());
    }
}
