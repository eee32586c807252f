//! In-memory storage backend for testing.

use std::sync::RwLock;

use crate::error::Result;
use crate::store::StorageBackend;

/// In-memory backend holding the document payload in a single slot.
///
/// Thread-safe via `RwLock`. The payload is lost when the backend is
/// dropped; this is the backend unit tests run the engine against.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slot: RwLock<Option<String>>,
}

impl MemoryBackend {
    /// Create a new empty in-memory backend.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Seed the backend with a raw payload, bypassing the handle.
    ///
    /// Useful for corruption tests.
    pub fn seed(&self, payload: impl Into<String>) {
        *self.slot.write().unwrap() = Some(payload.into());
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.slot.read().unwrap().clone())
    }

    fn write(&self, payload: &str) -> Result<()> {
        *self.slot.write().unwrap() = Some(payload.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.write().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::traits::tests::test_backend_contract;

    #[test]
    fn test_memory_backend_contract() {
        let backend = MemoryBackend::new();
        test_backend_contract(&backend);
    }

    #[test]
    fn test_seed() {
        let backend = MemoryBackend::new();
        backend.seed("garbage");
        assert_eq!(backend.read().unwrap().as_deref(), Some("garbage"));
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let backend = Arc::new(MemoryBackend::new());
        let mut handles = Vec::new();

        for i in 0..4 {
            let backend = Arc::clone(&backend);
            handles.push(thread::spawn(move || {
                backend.write(&format!("payload-{i}")).unwrap();
                backend.read().unwrap();
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(backend.read().unwrap().is_some());
    }
}
