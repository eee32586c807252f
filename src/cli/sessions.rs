//! Sessions command for cppdrill.
//!
//! Lists sessions with progress and score, most recently opened first,
//! useful for finding ids to pass to `cppdrill resume` and friends.

use serde::{Deserialize, Serialize};

use crate::core::{session_counts, SessionStatus, TrainingSession};
use crate::store::{StorageBackend, StoreHandle};

/// Options for the sessions command.
#[derive(Debug, Clone, Default)]
pub struct SessionsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Maximum number of sessions to show (0 = all).
    pub limit: usize,
}

/// Summary of a single session for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRow {
    /// Session id.
    pub id: String,
    /// Session title.
    pub title: String,
    /// Session status.
    pub status: String,
    /// One-based position in the problem list.
    pub current: usize,
    /// Number of problems in the session.
    pub total: usize,
    /// Problems solved.
    pub solved: u32,
    /// Problems failed.
    pub failed: u32,
    /// Last opened timestamp (ISO 8601).
    pub last_opened_at: String,
    /// Whether this is the active session.
    pub active: bool,
}

impl SessionRow {
    fn from_session(session: &TrainingSession, active_id: Option<&str>) -> Self {
        let counts = session_counts(Some(session));
        let status = match session.meta.status {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
        };

        Self {
            id: session.meta.id.clone(),
            title: session.meta.title.clone(),
            status: status.to_string(),
            current: counts.current,
            total: counts.total,
            solved: session.progress.score.solved,
            failed: session.progress.score.failed,
            last_opened_at: session.meta.last_opened_at.to_rfc3339(),
            active: Some(session.meta.id.as_str()) == active_id,
        }
    }
}

/// Output format for the sessions command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// List of session rows.
    pub sessions: Vec<SessionRow>,
    /// Total count of sessions returned.
    pub count: usize,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionsOutput {
    /// Create a successful output.
    pub fn success(sessions: Vec<SessionRow>) -> Self {
        let count = sessions.len();
        Self {
            success: true,
            sessions,
            count,
            error: None,
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if !self.success {
            return format!(
                "Sessions failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }

        if self.sessions.is_empty() {
            return "No sessions found.".to_string();
        }

        let mut lines = vec![format!("Sessions ({} found):", self.count)];
        lines.push(String::new());

        lines.push(format!(
            " {:<24}  {:<10}  {:<9}  {:<9}  {}",
            "ID", "STATUS", "PROGRESS", "SCORE", "OPENED"
        ));
        lines.push("-".repeat(80));

        for row in &self.sessions {
            let marker = if row.active { "*" } else { " " };
            // Truncate timestamp to date and time (YYYY-MM-DDTHH:MM:SS).
            let opened: String = row.last_opened_at.chars().take(19).collect();
            lines.push(format!(
                "{}{:<24}  {:<10}  {:>4}/{:<4}  {:>4}/{:<4}  {}",
                marker, row.id, row.status, row.current, row.total, row.solved, row.failed, opened
            ));
        }

        lines.join("\n")
    }
}

/// The sessions command implementation.
pub struct SessionsCommand<B: StorageBackend> {
    store: StoreHandle<B>,
}

impl<B: StorageBackend> SessionsCommand<B> {
    /// Create a new sessions command.
    pub fn new(store: StoreHandle<B>) -> Self {
        Self { store }
    }

    /// Run the sessions command.
    pub fn run(&self, options: &SessionsOptions) -> SessionsOutput {
        let active_id = crate::core::get_active_training_session_id(&self.store);

        let mut sessions = crate::core::list_training_sessions(&self.store);
        if options.limit > 0 {
            sessions.truncate(options.limit);
        }

        let rows = sessions
            .iter()
            .map(|s| SessionRow::from_session(s, active_id.as_deref()))
            .collect();

        SessionsOutput::success(rows)
    }

    /// Format output according to options.
    pub fn format_output(&self, output: &SessionsOutput, options: &SessionsOptions) -> String {
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

    fn command() -> SessionsCommand<MemoryBackend> {
        SessionsCommand::new(StoreHandle::new(MemoryBackend::new()))
    }

    fn create(cmd: &SessionsCommand<MemoryBackend>, problems: &[&str]) -> String {
        let ids = problems.iter().map(|s| s.to_string()).collect();
        create_training_session(
            &cmd.store,
            CreateSessionParams::new(TrainingConfig::default(), ids),
        )
        .unwrap()
    }

    #[test]
    fn test_sessions_empty() {
        let cmd = command();
        let output = cmd.run(&SessionsOptions::default());

        assert!(output.success);
        assert_eq!(output.count, 0);
        assert!(output.format_text().contains("No sessions found"));
    }

    #[test]
    fn test_sessions_marks_active_row() {
        let cmd = command();
        create(&cmd, &["p1"]);
        let second = create(&cmd, &["p2"]);

        let output = cmd.run(&SessionsOptions::default());
        assert_eq!(output.count, 2);

        let active: Vec<&SessionRow> = output.sessions.iter().filter(|r| r.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second);
    }

    #[test]
    fn test_sessions_respects_limit() {
        let cmd = command();
        for _ in 0..5 {
            create(&cmd, &["p1"]);
        }

        let options = SessionsOptions {
            limit: 3,
            ..Default::default()
        };
        let output = cmd.run(&options);
        assert_eq!(output.count, 3);
    }

    #[test]
    fn test_sessions_format_text_contains_rows() {
        let cmd = command();
        let id = create(&cmd, &["p1", "p2"]);

        let output = cmd.run(&SessionsOptions::default());
        let text = output.format_text();

        assert!(text.contains(&id));
        assert!(text.contains("active"));
    }
}
