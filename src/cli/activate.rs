//! Activate command for cppdrill.
//!
//! Points the store's active-session marker at a session, or clears it.

use serde::{Deserialize, Serialize};

use crate::core::{get_active_training_session_id, set_active_training_session};
use crate::store::{StorageBackend, StoreHandle};

/// Options for the activate command.
#[derive(Debug, Clone, Default)]
pub struct ActivateOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Session to activate; clears the marker when absent.
    pub session_id: Option<String>,
}

/// Output format for the activate command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivateOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// The active session after the command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_session_id: Option<String>,
    /// The request was ignored (unknown or completed session).
    pub ignored: bool,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActivateOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            active_session_id: None,
            ignored: false,
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if !self.success {
            return format!(
                "Activate failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }

        if self.ignored {
            return "Ignored: session is unknown or already completed.".to_string();
        }

        match &self.active_session_id {
            Some(id) => format!("Active session is now {}", id),
            None => "Active session cleared.".to_string(),
        }
    }
}

/// The activate command implementation.
pub struct ActivateCommand<B: StorageBackend> {
    store: StoreHandle<B>,
}

impl<B: StorageBackend> ActivateCommand<B> {
    /// Create a new activate command.
    pub fn new(store: StoreHandle<B>) -> Self {
        Self { store }
    }

    /// Run the activate command.
    pub fn run(&self, options: &ActivateOptions) -> ActivateOutput {
        if let Err(e) = set_active_training_session(&self.store, options.session_id.as_deref()) {
            return ActivateOutput::failure(format!("Failed to activate: {}", e));
        }

        let active = get_active_training_session_id(&self.store);
        let ignored = match &options.session_id {
            Some(requested) => active.as_deref() != Some(requested.as_str()),
            None => false,
        };

        ActivateOutput {
            success: true,
            active_session_id: active,
            ignored,
            error: None,
        }
    }

    /// Format output according to options.
    pub fn format_output(&self, output: &ActivateOutput, options: &ActivateOptions) -> String {
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
    use crate::core::sessions::{create_training_session, CreateSessionParams};
    use crate::store::MemoryBackend;

    fn command() -> ActivateCommand<MemoryBackend> {
        ActivateCommand::new(StoreHandle::new(MemoryBackend::new()))
    }

    #[test]
    fn test_activate_switches_sessions() {
        let cmd = command();
        let first = create_training_session(
            &cmd.store,
            CreateSessionParams::new(TrainingConfig::default(), vec!["p1".to_string()]),
        )
        .unwrap();
        create_training_session(
            &cmd.store,
            CreateSessionParams::new(TrainingConfig::default(), vec!["p2".to_string()]),
        )
        .unwrap();

        let options = ActivateOptions {
            session_id: Some(first.clone()),
            ..Default::default()
        };
        let output = cmd.run(&options);

        assert!(output.success);
        assert!(!output.ignored);
        assert_eq!(output.active_session_id, Some(first));
    }

    #[test]
    fn test_activate_unknown_session_is_ignored() {
        let cmd = command();
        let existing = create_training_session(
            &cmd.store,
            CreateSessionParams::new(TrainingConfig::default(), vec!["p1".to_string()]),
        )
        .unwrap();

        let options = ActivateOptions {
            session_id: Some("ts_missing".to_string()),
            ..Default::default()
        };
        let output = cmd.run(&options);

        assert!(output.success);
        assert!(output.ignored);
        assert_eq!(output.active_session_id, Some(existing));
        assert!(output.format_text().contains("Ignored"));
    }

    #[test]
    fn test_activate_without_id_clears_marker() {
        let cmd = command();
        create_training_session(
            &cmd.store,
            CreateSessionParams::new(TrainingConfig::default(), vec!["p1".to_string()]),
        )
        .unwrap();

        let output = cmd.run(&ActivateOptions::default());
        assert!(output.success);
        assert!(output.active_session_id.is_none());
        assert!(output.format_text().contains("cleared"));
    }
}
