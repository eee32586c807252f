//! Derived, read-only views over a session.
//!
//! Everything here tolerates `None` so callers can render placeholders
//! without branching on whether a session is loaded.

use crate::core::model::TrainingSession;

/// Position counters for a progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionCounts {
    /// Number of problems in the session.
    pub total: usize,
    /// Zero-based cursor into the problem list.
    pub index: usize,
    /// One-based position, clamped to `total`. Zero for an empty session.
    pub current: usize,
    /// Problems not yet finished.
    pub remaining: usize,
}

/// The problem id the cursor points at.
///
/// `None` when there is no session, the session is completed, or the
/// cursor is past the end of the list.
pub fn current_problem_id(session: Option<&TrainingSession>) -> Option<String> {
    let s = session?;
    if s.is_completed() {
        return None;
    }
    s.problem_ids.get(s.progress.current_index).cloned()
}

/// The problem id after the cursor, or `None` when it is the last one.
pub fn next_problem_id(session: Option<&TrainingSession>) -> Option<String> {
    let s = session?;
    s.problem_ids.get(s.progress.current_index + 1).cloned()
}

/// Position counters for the session, zeroed when absent.
pub fn session_counts(session: Option<&TrainingSession>) -> SessionCounts {
    let Some(s) = session else {
        return SessionCounts::default();
    };

    let total = s.problem_ids.len();
    let index = s.progress.current_index;
    SessionCounts {
        total,
        index,
        current: if total == 0 { 0 } else { (index + 1).min(total) },
        remaining: total.saturating_sub(index),
    }
}

/// Human-readable difficulty range, e.g. `"2-4"`.
///
/// Prefers the creation-time summary over the config so the display stays
/// stable even if config handling changes. Falls back to a dash when no
/// session is loaded.
pub fn difficulty_range(session: Option<&TrainingSession>) -> String {
    let Some(s) = session else {
        return "—".to_string();
    };

    let (min, max) = match &s.summary {
        Some(summary) => (summary.difficulty_min, summary.difficulty_max),
        None => (s.config.difficulty_min, s.config.difficulty_max),
    };
    format!("{min}-{max}")
}

/// The concept filter attached to the session, empty when absent.
pub fn concepts(session: Option<&TrainingSession>) -> Vec<String> {
    let Some(s) = session else {
        return Vec::new();
    };

    match &s.summary {
        Some(summary) => summary.concepts.clone(),
        None => s.config.concepts.clone(),
    }
}
