//! Storage backend trait for the training store.
//!
//! A backend is a single raw string slot: the whole store document is read
//! and written as one JSON payload. Parsing, versioning, and change
//! notification live in [`StoreHandle`](crate::store::StoreHandle); backends
//! only move bytes.

use std::sync::Arc;

use crate::error::Result;

/// Trait for training-store storage backends.
pub trait StorageBackend: Send + Sync {
    /// Read the stored payload.
    ///
    /// Returns `Ok(None)` if nothing has been stored yet.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored payload.
    fn write(&self, payload: &str) -> Result<()>;

    /// Remove the stored payload.
    ///
    /// Returns `Ok(())` even if nothing was stored.
    fn clear(&self) -> Result<()>;
}

/// Blanket implementation for Arc-wrapped backends.
///
/// Allows sharing one backend between a handle and a test without giving
/// up ownership.
impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    fn read(&self) -> Result<Option<String>> {
        (**self).read()
    }

    fn write(&self, payload: &str) -> Result<()> {
        (**self).write(payload)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// Test utilities for StorageBackend implementations.
#[cfg(test)]
pub mod tests {
    use super::*;

    /// Conformance check shared by all backend implementations.
    pub fn test_backend_contract<B: StorageBackend>(backend: &B) {
        // Empty slot reads as None.
        assert!(backend.read().unwrap().is_none());

        // Write then read back.
        backend.write("{\"a\":1}").unwrap();
        assert_eq!(backend.read().unwrap().as_deref(), Some("{\"a\":1}"));

        // Overwrite replaces the payload wholesale.
        backend.write("{\"a\":2}").unwrap();
        assert_eq!(backend.read().unwrap().as_deref(), Some("{\"a\":2}"));

        // Clear empties the slot; clearing twice is fine.
        backend.clear().unwrap();
        assert!(backend.read().unwrap().is_none());
        backend.clear().unwrap();
    }
}
