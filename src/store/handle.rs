//! The store handle: load, read-modify-write, and change notification.
//!
//! All mutation of the training store goes through a single "load the whole
//! document, compute a new whole document, write the whole document" cycle.
//! Within one process that cycle runs synchronously to completion, so it is
//! atomic with respect to this process's own logic. There is no
//! optimistic-concurrency check against the underlying storage: two
//! processes racing a read-modify-write are last-write-wins at document
//! granularity. That is an accepted property of the design, not a bug.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::error::Result;
use crate::store::{StorageBackend, TrainingStore, STORE_VERSION};

/// Handle returned by [`StoreHandle::subscribe`]; pass it to
/// [`StoreHandle::unsubscribe`] to stop receiving notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn() + Send + Sync>;

/// Owner of the training store document.
///
/// Wraps a [`StorageBackend`] with document parsing, version checking, the
/// update cycle, and an in-process subscriber list. Listeners fire
/// synchronously after every successful write.
pub struct StoreHandle<B: StorageBackend> {
    backend: B,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl<B: StorageBackend> StoreHandle<B> {
    /// Create a handle over the given backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Load the current document.
    ///
    /// A missing, unreadable, unparsable, or version-mismatched payload
    /// yields the default empty document. This never raises: storage
    /// corruption degrades to "start fresh".
    pub fn load(&self) -> TrainingStore {
        let raw = match self.backend.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return TrainingStore::default(),
            Err(err) => {
                tracing::warn!("failed to read training store: {} (starting fresh)", err);
                return TrainingStore::default();
            }
        };

        match serde_json::from_str::<TrainingStore>(&raw) {
            Ok(store) if store.version == STORE_VERSION => store,
            Ok(store) => {
                tracing::warn!(
                    "training store version {} does not match {} (starting fresh)",
                    store.version,
                    STORE_VERSION
                );
                TrainingStore::default()
            }
            Err(err) => {
                tracing::warn!("corrupt training store: {} (starting fresh)", err);
                TrainingStore::default()
            }
        }
    }

    /// Persist a document and notify subscribers.
    pub fn save(&self, store: &TrainingStore) -> Result<()> {
        let payload = serde_json::to_string(store)?;
        self.backend.write(&payload)?;
        tracing::debug!(sessions = store.sessions_by_id.len(), "training store saved");
        self.notify();
        Ok(())
    }

    /// Read-modify-write cycle.
    ///
    /// Loads the current document and applies `f`. A result of `Ok(None)`
    /// means "unchanged": nothing is written and no listeners fire. A
    /// result of `Ok(Some(next))` persists `next`. Errors from `f`
    /// propagate without writing. Returns the resulting document either
    /// way.
    pub fn update<F>(&self, f: F) -> Result<TrainingStore>
    where
        F: FnOnce(&TrainingStore) -> Result<Option<TrainingStore>>,
    {
        let prev = self.load();
        match f(&prev)? {
            Some(next) => {
                self.save(&next)?;
                Ok(next)
            }
            None => Ok(prev),
        }
    }

    /// Register a listener invoked after every successful write.
    ///
    /// Multiple independent subscribers are supported.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Unsubscribing twice is a no-op.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.lock().unwrap().retain(|(lid, _)| *lid != id);
    }

    fn notify(&self) {
        let listeners = self.listeners.lock().unwrap();
        for (_, listener) in listeners.iter() {
            listener();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingConfig;
    use crate::core::TrainingSession;
    use crate::store::MemoryBackend;
    use chrono::Utc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn handle() -> StoreHandle<MemoryBackend> {
        StoreHandle::new(MemoryBackend::new())
    }

    fn session(id: &str) -> TrainingSession {
        TrainingSession::new(
            id,
            "Test",
            TrainingConfig::default(),
            vec!["p1".to_string()],
            Utc::now(),
        )
    }

    #[test]
    fn test_load_empty_backend_returns_default() {
        let store = handle().load();
        assert_eq!(store, TrainingStore::default());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let handle = handle();

        let mut store = TrainingStore::default();
        store
            .sessions_by_id
            .insert("ts_1".to_string(), session("ts_1"));
        store.active_session_id = Some("ts_1".to_string());

        handle.save(&store).unwrap();
        assert_eq!(handle.load(), store);
    }

    #[test]
    fn test_load_corrupt_payload_returns_default() {
        let backend = MemoryBackend::new();
        backend.seed("this is not json");

        let handle = StoreHandle::new(backend);
        assert_eq!(handle.load(), TrainingStore::default());
    }

    #[test]
    fn test_load_version_mismatch_returns_default() {
        let backend = MemoryBackend::new();
        backend.seed(r#"{"version":99,"activeSessionId":null,"sessionsById":{}}"#);

        let handle = StoreHandle::new(backend);
        assert_eq!(handle.load(), TrainingStore::default());
    }

    #[test]
    fn test_update_writes_and_returns_new_document() {
        let handle = handle();

        let result = handle
            .update(|prev| {
                let mut next = prev.clone();
                next.sessions_by_id
                    .insert("ts_1".to_string(), session("ts_1"));
                Ok(Some(next))
            })
            .unwrap();

        assert_eq!(result.sessions_by_id.len(), 1);
        assert_eq!(handle.load(), result);
    }

    #[test]
    fn test_update_unchanged_skips_write() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = handle();

        let c = Arc::clone(&counter);
        handle.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        handle.update(|_| Ok(None)).unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        // Nothing was ever written to the backend.
        assert!(handle.backend().read().unwrap().is_none());
    }

    #[test]
    fn test_update_error_propagates_without_write() {
        let handle = handle();

        let result = handle.update(|_| {
            Err(crate::error::DrillError::session_not_found("ts_missing"))
        });

        assert!(result.is_err());
        assert!(handle.backend().read().unwrap().is_none());
    }

    #[test]
    fn test_subscribers_fire_on_every_save() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handle = handle();

        let c = Arc::clone(&counter);
        handle.subscribe(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        handle.save(&TrainingStore::default()).unwrap();
        handle.save(&TrainingStore::default()).unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_multiple_independent_subscribers() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let handle = handle();

        let f = Arc::clone(&first);
        handle.subscribe(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        let s = Arc::clone(&second);
        let second_id = handle.subscribe(move || {
            s.fetch_add(1, Ordering::SeqCst);
        });

        handle.save(&TrainingStore::default()).unwrap();
        handle.unsubscribe(second_id);
        handle.save(&TrainingStore::default()).unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 2);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let handle = handle();
        let id = handle.subscribe(|| {});

        handle.unsubscribe(id);
        handle.unsubscribe(id);
    }
}
