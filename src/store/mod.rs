//! Persistent store for cppdrill.
//!
//! One versioned JSON document holds every training session plus the
//! active-session pointer. Backends move raw payloads; the handle owns
//! parsing, the read-modify-write cycle, and change notification.

pub mod document;
pub mod file;
pub mod handle;
pub mod memory;
pub mod traits;

pub use document::{new_id, new_session_id, TrainingStore, STORE_VERSION};
pub use file::FileBackend;
pub use handle::{StoreHandle, SubscriptionId};
pub use memory::MemoryBackend;
pub use traits::StorageBackend;
