//! The persisted store document and id generation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::TrainingSession;

/// Version tag of the persisted document layout.
///
/// A payload with any other version is discarded wholesale on load; there
/// is no migration path.
pub const STORE_VERSION: u32 = 1;

/// The outer envelope holding all sessions and the active-session pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingStore {
    pub version: u32,
    /// At most one session is active at a time; `None` means no session is
    /// currently directed at the user.
    pub active_session_id: Option<String>,
    pub sessions_by_id: HashMap<String, TrainingSession>,
}

impl Default for TrainingStore {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            active_session_id: None,
            sessions_by_id: HashMap::new(),
        }
    }
}

impl TrainingStore {
    /// Look up a session by id.
    pub fn session(&self, id: &str) -> Option<&TrainingSession> {
        self.sessions_by_id.get(id)
    }
}

/// Generate an opaque session id: a fixed prefix, a base-36 timestamp
/// component, and a random suffix.
///
/// Uniqueness is best-effort (birthday-bound), which is fine for a
/// single-user local store.
pub fn new_session_id() -> String {
    new_id("ts")
}

/// Generate an opaque id with the given prefix.
pub fn new_id(prefix: &str) -> String {
    use rand::Rng;

    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let suffix: String = rand::thread_rng()
        .sample_iter(rand::distributions::Alphanumeric)
        .take(6)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();

    format!("{}_{}_{}", prefix, to_base36(millis), suffix)
}

/// Encode a number in lowercase base 36.
fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    out.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document() {
        let store = TrainingStore::default();
        assert_eq!(store.version, STORE_VERSION);
        assert!(store.active_session_id.is_none());
        assert!(store.sessions_by_id.is_empty());
    }

    #[test]
    fn test_document_json_field_names() {
        let store = TrainingStore::default();
        let json = serde_json::to_string(&store).unwrap();

        assert!(json.contains("\"version\":1"));
        assert!(json.contains("\"activeSessionId\":null"));
        assert!(json.contains("\"sessionsById\":{}"));
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1234567890), "kf12oi");
    }

    #[test]
    fn test_new_id_shape() {
        let id = new_session_id();
        let parts: Vec<&str> = id.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ts");
        assert!(!parts[1].is_empty());
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_new_ids_are_distinct() {
        let a = new_session_id();
        let b = new_session_id();
        assert_ne!(a, b);
    }
}
