//! Complete command for cppdrill.
//!
//! Marks a session completed regardless of remaining problems.

use serde::{Deserialize, Serialize};

use crate::core::{
    get_active_training_session_id, get_training_session, mark_session_completed,
};
use crate::store::{StorageBackend, StoreHandle};

/// Options for the complete command.
#[derive(Debug, Clone, Default)]
pub struct CompleteOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Session id; the active session when absent.
    pub session_id: Option<String>,
}

/// Output format for the complete command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// The completed session id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Problems solved.
    pub solved: u32,
    /// Problems failed.
    pub failed: u32,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompleteOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: None,
            solved: 0,
            failed: 0,
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if !self.success {
            return format!(
                "Complete failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }

        format!(
            "Session {} completed: {} solved, {} failed.",
            self.session_id.as_deref().unwrap_or("-"),
            self.solved,
            self.failed
        )
    }
}

/// The complete command implementation.
pub struct CompleteCommand<B: StorageBackend> {
    store: StoreHandle<B>,
}

impl<B: StorageBackend> CompleteCommand<B> {
    /// Create a new complete command.
    pub fn new(store: StoreHandle<B>) -> Self {
        Self { store }
    }

    /// Run the complete command.
    pub fn run(&self, options: &CompleteOptions) -> CompleteOutput {
        let session_id = match options
            .session_id
            .clone()
            .or_else(|| get_active_training_session_id(&self.store))
        {
            Some(id) => id,
            None => return CompleteOutput::failure("No active session."),
        };

        if let Err(e) = mark_session_completed(&self.store, &session_id) {
            return CompleteOutput::failure(format!("Failed to complete: {}", e));
        }

        let score = get_training_session(&self.store, &session_id)
            .map(|s| s.progress.score)
            .unwrap_or_default();

        CompleteOutput {
            success: true,
            session_id: Some(session_id),
            solved: score.solved,
            failed: score.failed,
            error: None,
        }
    }

    /// Format output according to options.
    pub fn format_output(&self, output: &CompleteOutput, options: &CompleteOptions) -> String {
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
    use crate::core::SessionStatus;
    use crate::store::MemoryBackend;

    fn command() -> CompleteCommand<MemoryBackend> {
        CompleteCommand::new(StoreHandle::new(MemoryBackend::new()))
    }

    #[test]
    fn test_complete_active_session() {
        let cmd = command();
        let id = create_training_session(
            &cmd.store,
            CreateSessionParams::new(TrainingConfig::default(), vec!["p1".to_string()]),
        )
        .unwrap();

        let output = cmd.run(&CompleteOptions::default());
        assert!(output.success);
        assert_eq!(output.session_id, Some(id.clone()));

        let s = crate::core::get_training_session(&cmd.store, &id).unwrap();
        assert_eq!(s.meta.status, SessionStatus::Completed);
    }

    #[test]
    fn test_complete_unknown_session_fails() {
        let cmd = command();
        let options = CompleteOptions {
            session_id: Some("ts_missing".to_string()),
            ..Default::default()
        };
        let output = cmd.run(&options);
        assert!(!output.success);
    }

    #[test]
    fn test_complete_without_active_session_fails() {
        let cmd = command();
        let output = cmd.run(&CompleteOptions::default());
        assert!(!output.success);
        assert!(output.format_text().contains("No active session"));
    }
}
