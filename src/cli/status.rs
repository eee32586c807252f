//! Status command for cppdrill.
//!
//! Shows the active session (or a named one): position, score, timers and
//! the problem currently on deck.

use serde::{Deserialize, Serialize};

use crate::core::{
    concepts, current_problem_id, difficulty_range, get_active_training_session,
    get_training_session, next_problem_id, session_counts, SessionStatus, TrainingSession,
};
use crate::store::{StorageBackend, StoreHandle};
use crate::util::format_mmss;

/// Options for the status command.
#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Session id to inspect; the active session when absent.
    pub session_id: Option<String>,
}

/// Output format for the status command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// Session id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Session title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Session status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Difficulty range, e.g. "1-5".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Concept filter.
    pub concepts: Vec<String>,
    /// One-based position in the problem list.
    pub current: usize,
    /// Number of problems in the session.
    pub total: usize,
    /// Problems solved.
    pub solved: u32,
    /// Problems failed.
    pub failed: u32,
    /// Total attempts recorded.
    pub attempts_total: u32,
    /// Problems solved on the first try.
    pub correct_on_first_try: u32,
    /// Current problem id, when one is on deck.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_problem_id: Option<String>,
    /// Next problem id, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_problem_id: Option<String>,
    /// Session timer remaining, seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_seconds_remaining: Option<u32>,
    /// Problem timer remaining, seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_seconds_remaining: Option<u32>,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: None,
            title: None,
            status: None,
            difficulty: None,
            concepts: vec![],
            current: 0,
            total: 0,
            solved: 0,
            failed: 0,
            attempts_total: 0,
            correct_on_first_try: 0,
            current_problem_id: None,
            next_problem_id: None,
            session_seconds_remaining: None,
            problem_seconds_remaining: None,
            error: Some(error.into()),
        }
    }

    fn from_session(session: &TrainingSession) -> Self {
        let counts = session_counts(Some(session));
        let score = &session.progress.score;
        let timers = &session.progress.timers;
        let status = match session.meta.status {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        };

        Self {
            success: true,
            session_id: Some(session.meta.id.clone()),
            title: Some(session.meta.title.clone()),
            status: Some(status.to_string()),
            difficulty: Some(difficulty_range(Some(session))),
            concepts: concepts(Some(session)),
            current: counts.current,
            total: counts.total,
            solved: score.solved,
            failed: score.failed,
            attempts_total: score.attempts_total,
            correct_on_first_try: score.correct_on_first_try,
            current_problem_id: current_problem_id(Some(session)),
            next_problem_id: next_problem_id(Some(session)),
            session_seconds_remaining: timers.session_seconds_remaining,
            problem_seconds_remaining: timers.problem_seconds_remaining,
            error: None,
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if !self.success {
            return format!(
                "Status failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = vec![format!(
            "{} [{}]",
            self.title.as_deref().unwrap_or("-"),
            self.session_id.as_deref().unwrap_or("-")
        )];

        lines.push(format!(
            "Status: {}  Problem {}/{}  Difficulty {}",
            self.status.as_deref().unwrap_or("-"),
            self.current,
            self.total,
            self.difficulty.as_deref().unwrap_or("-")
        ));

        if !self.concepts.is_empty() {
            lines.push(format!("Concepts: {}", self.concepts.join(", ")));
        }

        lines.push(format!(
            "Score: {} solved, {} failed, {} attempts ({} first-try)",
            self.solved, self.failed, self.attempts_total, self.correct_on_first_try
        ));

        if let Some(seconds) = self.session_seconds_remaining {
            lines.push(format!("Session timer: {}", format_mmss(seconds as i64)));
        }
        if let Some(seconds) = self.problem_seconds_remaining {
            lines.push(format!("Problem timer: {}", format_mmss(seconds as i64)));
        }

        match &self.current_problem_id {
            Some(id) => lines.push(format!("Current problem: {}", id)),
            None => lines.push("No problem on deck.".to_string()),
        }

        lines.join("\n")
    }
}

/// The status command implementation.
pub struct StatusCommand<B: StorageBackend> {
    store: StoreHandle<B>,
}

impl<B: StorageBackend> StatusCommand<B> {
    /// Create a new status command.
    pub fn new(store: StoreHandle<B>) -> Self {
        Self { store }
    }

    /// Run the status command.
    pub fn run(&self, options: &StatusOptions) -> StatusOutput {
        let session = match &options.session_id {
            Some(id) => get_training_session(&self.store, id),
            None => get_active_training_session(&self.store),
        };

        match session {
            Some(s) => StatusOutput::from_session(&s),
            None => match &options.session_id {
                Some(id) => StatusOutput::failure(format!("Session not found: {}", id)),
                None => StatusOutput::failure("No active session."),
            },
        }
    }

    /// Format output according to options.
    pub fn format_output(&self, output: &StatusOutput, options: &StatusOptions) -> String {
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

    fn command() -> StatusCommand<MemoryBackend> {
        StatusCommand::new(StoreHandle::new(MemoryBackend::new()))
    }

    #[test]
    fn test_status_of_active_session() {
        let cmd = command();
        let mut config = TrainingConfig::default();
        config.set_problem_timer(Some(90));
        config.concepts = vec!["pointers".to_string()];

        let id = create_training_session(
            &cmd.store,
            CreateSessionParams::new(config, vec!["p1".to_string(), "p2".to_string()]),
        )
        .unwrap();

        let output = cmd.run(&StatusOptions::default());
        assert!(output.success);
        assert_eq!(output.session_id, Some(id));
        assert_eq!(output.current, 1);
        assert_eq!(output.total, 2);
        assert_eq!(output.current_problem_id.as_deref(), Some("p1"));
        assert_eq!(output.next_problem_id.as_deref(), Some("p2"));
        assert_eq!(output.problem_seconds_remaining, Some(90));

        let text = output.format_text();
        assert!(text.contains("Problem 1/2"));
        assert!(text.contains("Problem timer: 1:30"));
        assert!(text.contains("pointers"));
    }

    #[test]
    fn test_status_without_active_session_fails() {
        let cmd = command();
        let output = cmd.run(&StatusOptions::default());
        assert!(!output.success);
        assert!(output.format_text().contains("No active session"));
    }

    #[test]
    fn test_status_unknown_session_fails() {
        let cmd = command();
        let options = StatusOptions {
            session_id: Some("ts_missing".to_string()),
            ..Default::default()
        };
        let output = cmd.run(&options);
        assert!(!output.success);
        assert!(output.error.as_deref().unwrap().contains("ts_missing"));
    }
}
