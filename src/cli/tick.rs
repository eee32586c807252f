//! Tick command for cppdrill.
//!
//! Advances a session's timers against the wall clock and acts on an
//! expiry: a problem timer concedes the current problem, a session timer
//! completes the session. The engine only reports the zero crossing; what
//! happens next is decided here.

use serde::{Deserialize, Serialize};

use crate::core::model::SubmissionEvaluation;
use crate::core::timers::{tick, TimerKind};
use crate::core::{
    current_problem_id, get_active_training_session_id, get_training_session,
    mark_session_completed, record_attempt,
};
use crate::store::{StorageBackend, StoreHandle};
use crate::util::format_mmss;

/// Options for the tick command.
#[derive(Debug, Clone, Default)]
pub struct TickOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Session id; the active session when absent.
    pub session_id: Option<String>,
}

/// Output format for the tick command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// The ticked session id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// A timer crossed zero during this tick.
    pub expired: bool,
    /// Which timer crossed, when `expired` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_kind: Option<TimerKind>,
    /// The current problem was conceded because its timer ran out.
    pub problem_conceded: bool,
    /// The session was completed because its timer ran out.
    pub session_completed: bool,
    /// Session timer remaining, seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_seconds_remaining: Option<u32>,
    /// Problem timer remaining, seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_seconds_remaining: Option<u32>,
    /// Problem now on deck, when one remains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_problem_id: Option<String>,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TickOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: None,
            expired: false,
            expired_kind: None,
            problem_conceded: false,
            session_completed: false,
            session_seconds_remaining: None,
            problem_seconds_remaining: None,
            current_problem_id: None,
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if !self.success {
            return format!(
                "Tick failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();

        if let Some(seconds) = self.session_seconds_remaining {
            lines.push(format!("Session timer: {}", format_mmss(seconds as i64)));
        }
        if let Some(seconds) = self.problem_seconds_remaining {
            lines.push(format!("Problem timer: {}", format_mmss(seconds as i64)));
        }

        if self.session_completed {
            lines.push("Session timer expired; session completed.".to_string());
        } else if self.problem_conceded {
            match &self.current_problem_id {
                Some(id) => lines.push(format!(
                    "Problem timer expired; moving on to {}",
                    id
                )),
                None => lines.push(
                    "Problem timer expired; that was the last problem.".to_string(),
                ),
            }
        }

        if lines.is_empty() {
            lines.push("No timers running.".to_string());
        }

        lines.join("\n")
    }
}

/// The tick command implementation.
pub struct TickCommand<B: StorageBackend> {
    store: StoreHandle<B>,
}

impl<B: StorageBackend> TickCommand<B> {
    /// Create a new tick command.
    pub fn new(store: StoreHandle<B>) -> Self {
        Self { store }
    }

    /// Run the tick command.
    pub fn run(&self, options: &TickOptions) -> TickOutput {
        let session_id = match options
            .session_id
            .clone()
            .or_else(|| get_active_training_session_id(&self.store))
        {
            Some(id) => id,
            None => return TickOutput::failure("No active session."),
        };

        let result = match tick(&self.store, &session_id) {
            Ok(result) => result,
            Err(e) => return TickOutput::failure(format!("Failed to tick: {}", e)),
        };

        let mut output = TickOutput {
            success: true,
            session_id: Some(session_id.clone()),
            expired: result.expired,
            expired_kind: result.expired_kind,
            problem_conceded: false,
            session_completed: false,
            session_seconds_remaining: None,
            problem_seconds_remaining: None,
            current_problem_id: None,
            error: None,
        };

        if result.expired {
            match result.expired_kind {
                Some(TimerKind::Problem) => {
                    let concession = SubmissionEvaluation::give_up("Problem timer expired !");
                    if let Err(e) = record_attempt(&self.store, &session_id, concession) {
                        return TickOutput::failure(format!("Failed to concede problem: {}", e));
                    }
                    output.problem_conceded = true;
                }
                Some(TimerKind::Session) => {
                    if let Err(e) = mark_session_completed(&self.store, &session_id) {
                        return TickOutput::failure(format!("Failed to complete session: {}", e));
                    }
                    output.session_completed = true;
                }
                None => {}
            }
        }

        let after = get_training_session(&self.store, &session_id);
        if let Some(s) = &after {
            output.session_seconds_remaining = s.progress.timers.session_seconds_remaining;
            output.problem_seconds_remaining = s.progress.timers.problem_seconds_remaining;
        }
        output.current_problem_id = current_problem_id(after.as_ref());

        output
    }

    /// Format output according to options.
    pub fn format_output(&self, output: &TickOutput, options: &TickOptions) -> String {
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
