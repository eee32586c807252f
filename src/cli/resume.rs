//! Resume command for cppdrill.
//!
//! Reopens a session, makes it active and re-anchors its timers.

use serde::{Deserialize, Serialize};

use crate::core::{current_problem_id, get_training_session, resume_training_session};
use crate::store::{StorageBackend, StoreHandle};

/// Options for the resume command.
#[derive(Debug, Clone, Default)]
pub struct ResumeOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the resume command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// The resumed session id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Whether the session was already completed (left untouched).
    pub completed: bool,
    /// Problem to present next.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_problem_id: Option<String>,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResumeOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: None,
            completed: false,
            current_problem_id: None,
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if !self.success {
            return format!(
                "Resume failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }

        let id = self.session_id.as_deref().unwrap_or("-");
        if self.completed {
            return format!("Session {} is already completed.", id);
        }

        match &self.current_problem_id {
            Some(problem) => format!("Resumed session {}; current problem {}", id, problem),
            None => format!("Resumed session {}", id),
        }
    }
}

/// The resume command implementation.
pub struct ResumeCommand<B: StorageBackend> {
    store: StoreHandle<B>,
}

impl<B: StorageBackend> ResumeCommand<B> {
    /// Create a new resume command.
    pub fn new(store: StoreHandle<B>) -> Self {
        Self { store }
    }

    /// Run the resume command.
    pub fn run(&self, session_id: &str, _options: &ResumeOptions) -> ResumeOutput {
        if let Err(e) = resume_training_session(&self.store, session_id) {
            return ResumeOutput::failure(format!("Failed to resume: {}", e));
        }

        let session = get_training_session(&self.store, session_id);
        let completed = session.as_ref().is_some_and(|s| s.is_completed());

        ResumeOutput {
            success: true,
            session_id: Some(session_id.to_string()),
            completed,
            current_problem_id: current_problem_id(session.as_ref()),
            error: None,
        }
    }

    /// Format output according to options.
    pub fn format_output(&self, output: &ResumeOutput, options: &ResumeOptions) -> String {
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
        create_training_session, get_active_training_session_id, set_active_training_session,
        CreateSessionParams,
    };
    use crate::store::MemoryBackend;

    fn command() -> ResumeCommand<MemoryBackend> {
        ResumeCommand::new(StoreHandle::new(MemoryBackend::new()))
    }

    #[test]
    fn test_resume_reactivates_session() {
        let cmd = command();
        let id = create_training_session(
            &cmd.store,
            CreateSessionParams::new(TrainingConfig::default(), vec!["p1".to_string()]),
        )
        .unwrap();
        set_active_training_session(&cmd.store, None).unwrap();

        let output = cmd.run(&id, &ResumeOptions::default());
        assert!(output.success);
        assert!(!output.completed);
        assert_eq!(output.current_problem_id.as_deref(), Some("p1"));
        assert_eq!(get_active_training_session_id(&cmd.store), Some(id));
    }

    #[test]
    fn test_resume_completed_session_reports_it() {
        let cmd = command();
        let id = create_training_session(
            &cmd.store,
            CreateSessionParams::new(TrainingConfig::default(), Vec::new()),
        )
        .unwrap();

        let output = cmd.run(&id, &ResumeOptions::default());
        assert!(output.success);
        assert!(output.completed);
        assert!(output.format_text().contains("already completed"));
    }

    #[test]
    fn test_resume_unknown_session_fails() {
        let cmd = command();
        let output = cmd.run("ts_missing", &ResumeOptions::default());
        assert!(!output.success);
    }
}
