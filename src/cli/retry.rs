//! Retry command for cppdrill.
//!
//! Rewinds a session by one problem so the most recent one can be redone.

use serde::{Deserialize, Serialize};

use crate::core::{get_active_training_session_id, retry_last_problem};
use crate::store::{StorageBackend, StoreHandle};

/// Options for the retry command.
#[derive(Debug, Clone, Default)]
pub struct RetryOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Session id; the active session when absent.
    pub session_id: Option<String>,
}

/// Output format for the retry command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// The problem to redo, when the rewind happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<String>,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RetryOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            problem_id: None,
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if !self.success {
            return format!(
                "Retry failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }

        match &self.problem_id {
            Some(id) => format!("Rewound one problem; redoing {}", id),
            None => "Nothing to retry; session is at its first problem.".to_string(),
        }
    }
}

/// The retry command implementation.
pub struct RetryCommand<B: StorageBackend> {
    store: StoreHandle<B>,
}

impl<B: StorageBackend> RetryCommand<B> {
    /// Create a new retry command.
    pub fn new(store: StoreHandle<B>) -> Self {
        Self { store }
    }

    /// Run the retry command.
    pub fn run(&self, options: &RetryOptions) -> RetryOutput {
        let session_id = match options
            .session_id
            .clone()
            .or_else(|| get_active_training_session_id(&self.store))
        {
            Some(id) => id,
            None => return RetryOutput::failure("No active session."),
        };

        match retry_last_problem(&self.store, &session_id) {
            Ok(problem_id) => RetryOutput {
                success: true,
                problem_id,
                error: None,
            },
            Err(e) => RetryOutput::failure(format!("Failed to retry: {}", e)),
        }
    }

    /// Format output according to options.
    pub fn format_output(&self, output: &RetryOutput, options: &RetryOptions) -> String {
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
