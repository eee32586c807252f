//! Answer command for cppdrill.
//!
//! Evaluates a guess against the current problem's expected outcome and
//! records the attempt on the session.

use serde::{Deserialize, Serialize};

use crate::catalog::{ErrorType, ProblemCatalog};
use crate::core::model::{SubmissionEvaluation, UserSubmission};
use crate::core::{
    current_problem_id, get_active_training_session, get_training_session, next_problem_id,
    record_attempt,
};
use crate::store::{StorageBackend, StoreHandle};

/// Options for the answer command.
#[derive(Debug, Clone, Default)]
pub struct AnswerOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Session id; the active session when absent.
    pub session_id: Option<String>,
    /// The guessed outcome.
    pub error_type: Option<ErrorType>,
    /// The guessed stdout; only meaningful with a no-error outcome.
    pub stdout: Option<String>,
    /// Concede the problem instead of guessing.
    pub give_up: bool,
}

/// Output format for the answer command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// Session the attempt was recorded on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Whether the guess was correct.
    pub correct: bool,
    /// Verdict for the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// The current problem is finished.
    pub finished_problem: bool,
    /// The session just completed.
    pub finished_session: bool,
    /// Attempts used on the current problem so far.
    pub attempts_on_current: u32,
    /// Next problem to present, when one remains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_problem_id: Option<String>,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnswerOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: None,
            correct: false,
            summary: None,
            finished_problem: false,
            finished_session: false,
            attempts_on_current: 0,
            next_problem_id: None,
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if !self.success {
            return format!(
                "Answer failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = vec![self.summary.clone().unwrap_or_default()];

        if self.finished_session {
            lines.push("Session complete.".to_string());
        } else if self.finished_problem {
            match &self.next_problem_id {
                Some(id) => lines.push(format!("Next problem: {}", id)),
                None => lines.push("No more problems.".to_string()),
            }
        } else {
            lines.push(format!(
                "Attempt {} recorded; problem still open.",
                self.attempts_on_current
            ));
        }

        lines.retain(|l| !l.is_empty());
        lines.join("\n")
    }
}

/// The answer command implementation.
pub struct AnswerCommand<B: StorageBackend> {
    store: StoreHandle<B>,
    catalog: ProblemCatalog,
}

impl<B: StorageBackend> AnswerCommand<B> {
    /// Create a new answer command.
    pub fn new(store: StoreHandle<B>, catalog: ProblemCatalog) -> Self {
        Self { store, catalog }
    }

    /// Run the answer command.
    pub fn run(&self, options: &AnswerOptions) -> AnswerOutput {
        let session = match &options.session_id {
            Some(id) => get_training_session(&self.store, id),
            None => get_active_training_session(&self.store),
        };

        let Some(session) = session else {
            return match &options.session_id {
                Some(id) => AnswerOutput::failure(format!("Session not found: {}", id)),
                None => AnswerOutput::failure("No active session."),
            };
        };

        let Some(problem_id) = current_problem_id(Some(&session)) else {
            return AnswerOutput::failure("No problem on deck.");
        };

        let evaluation = if options.give_up {
            SubmissionEvaluation::give_up("You gave up :(")
        } else {
            let Some(error_type) = options.error_type else {
                return AnswerOutput::failure("An outcome is required unless giving up.");
            };
            let problem = match self.catalog.require(&problem_id) {
                Ok(problem) => problem,
                Err(e) => return AnswerOutput::failure(e.to_string()),
            };

            let submission = UserSubmission {
                error_type,
                stdout: options.stdout.clone(),
            };
            crate::catalog::validate_guess(problem, &submission)
        };

        let correct = evaluation.success;
        let summary = evaluation.summary.clone();
        let session_id = session.meta.id.clone();

        let outcome = match record_attempt(&self.store, &session_id, evaluation) {
            Ok(outcome) => outcome,
            Err(e) => return AnswerOutput::failure(format!("Failed to record attempt: {}", e)),
        };

        let after = get_training_session(&self.store, &session_id);

        AnswerOutput {
            success: true,
            session_id: Some(session_id),
            correct,
            summary: Some(summary),
            finished_problem: outcome.finished_problem,
            finished_session: outcome.finished_session,
            attempts_on_current: after
                .as_ref()
                .map(|s| s.progress.attempts_on_current)
                .unwrap_or(0),
            next_problem_id: current_problem_id(after.as_ref())
                .or_else(|| next_problem_id(after.as_ref())),
            error: None,
        }
    }

    /// Format output according to options.
    pub fn format_output(&self, output: &AnswerOutput, options: &AnswerOptions) -> String {
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
