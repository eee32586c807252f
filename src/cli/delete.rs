//! Delete command for cppdrill.
//!
//! Removes a session from the store.

use serde::{Deserialize, Serialize};

use crate::core::{delete_training_session, get_training_session};
use crate::store::{StorageBackend, StoreHandle};

/// Options for the delete command.
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the delete command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// The deleted session id.
    pub session_id: String,
    /// Whether the session existed.
    pub existed: bool,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeleteOutput {
    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if !self.success {
            return format!(
                "Delete failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }

        if self.existed {
            format!("Deleted session {}", self.session_id)
        } else {
            format!("Session {} does not exist; nothing to delete.", self.session_id)
        }
    }
}

/// The delete command implementation.
pub struct DeleteCommand<B: StorageBackend> {
    store: StoreHandle<B>,
}

impl<B: StorageBackend> DeleteCommand<B> {
    /// Create a new delete command.
    pub fn new(store: StoreHandle<B>) -> Self {
        Self { store }
    }

    /// Run the delete command.
    pub fn run(&self, session_id: &str, _options: &DeleteOptions) -> DeleteOutput {
        let existed = get_training_session(&self.store, session_id).is_some();

        match delete_training_session(&self.store, session_id) {
            Ok(()) => DeleteOutput {
                success: true,
                session_id: session_id.to_string(),
                existed,
                error: None,
            },
            Err(e) => DeleteOutput {
                success: false,
                session_id: session_id.to_string(),
                existed,
                error: Some(format!("Failed to delete: {}", e)),
            },
        }
    }

    /// Format output according to options.
    pub fn format_output(&self, output: &DeleteOutput, options: &DeleteOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            output.format_text()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingConfig;
    use crate::core::sessions::{
        create_training_session, get_active_training_session_id, CreateSessionParams,
    };
    use crate::store::MemoryBackend;

    fn command() -> DeleteCommand<MemoryBackend> {
        DeleteCommand::new(StoreHandle::new(MemoryBackend::new()))
    }

    #[test]
    fn test_delete_existing_session() {
        let cmd = command();
        let id = create_training_session(
            &cmd.store,
            CreateSessionParams::new(TrainingConfig::default(), vec!["p1".to_string()]),
        )
        .unwrap();

        let output = cmd.run(&id, &DeleteOptions::default());
        assert!(output.success);
        assert!(output.existed);
        assert!(get_training_session(&cmd.store, &id).is_none());
        assert_eq!(get_active_training_session_id(&cmd.store), None);
    }

    #[test]
    fn test_delete_unknown_session_is_a_noop() {
        let cmd = command();
        let output = cmd.run("ts_missing", &DeleteOptions::default());
        assert!(output.success);
        assert!(!output.existed);
        assert!(output.format_text().contains("nothing to delete"));
    }
}
