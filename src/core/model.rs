//! Training session types for cppdrill.
//!
//! A [`TrainingSession`] is a bounded run through a fixed, ordered subset of
//! problems, with its own score and timer state. Sessions are persisted as
//! part of the [`TrainingStore`](crate::store::TrainingStore) document; the
//! JSON field names below are the persisted layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ErrorType;
use crate::config::TrainingConfig;

/// Session lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// In progress (or resumable).
    #[default]
    Active,
    /// All problems consumed, or explicitly finished.
    Completed,
}

/// What the user submitted for a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSubmission {
    /// The guessed outcome classification.
    pub error_type: ErrorType,
    /// Guessed stdout, meaningful only for a no-error guess.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
}

/// How the validator judged a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEvaluation {
    /// Whether the guess matched the expected outcome.
    pub success: bool,
    /// The user abandoned the problem; counts as an immediate failure.
    #[serde(default)]
    pub give_up: bool,
    /// Short human-readable verdict.
    #[serde(default)]
    pub summary: String,
    /// The submission that produced this evaluation, for display on retry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<UserSubmission>,
}

impl SubmissionEvaluation {
    /// An explicit give-up: a failing attempt that immediately exhausts the
    /// problem.
    pub fn give_up(summary: impl Into<String>) -> Self {
        Self {
            success: false,
            give_up: true,
            summary: summary.into(),
            submission: None,
        }
    }
}

/// Score counters for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrainingScore {
    /// Problems answered correctly.
    pub solved: u32,
    /// Problems failed by give-up or exhausted attempts.
    pub failed: u32,
    /// Total submissions across all problems.
    pub attempts_total: u32,
    /// Problems solved on the first submission.
    pub correct_on_first_try: u32,
}

/// Countdown bookkeeping for a session.
///
/// At most one of `session_seconds_remaining` / `problem_seconds_remaining`
/// is set, mirroring the config's mutual exclusion. `last_tick_at` is the
/// anchor for elapsed-time math; `None` means "anchor on the next tick",
/// which is how attempts and retries reseed a fresh problem countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_seconds_remaining: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_seconds_remaining: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_tick_at: Option<DateTime<Utc>>,
}

/// Mutable progress state for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingProgress {
    /// 0-based cursor into `problem_ids`; equals the list length exactly
    /// when the session is completed.
    pub current_index: usize,
    /// Submissions on the current problem.
    pub attempts_on_current: u32,
    /// Most recent evaluation, kept for retry/undo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_answer: Option<SubmissionEvaluation>,

    pub score: TrainingScore,
    pub timers: TimerState,

    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Identity and status of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMeta {
    /// Opaque session id.
    pub id: String,
    /// Title shown when listing sessions.
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_opened_at: DateTime<Utc>,
    pub status: SessionStatus,
}

/// Denormalized snapshot of the filter parameters, so listings can show
/// what a session is about without re-reading the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub difficulty_min: u8,
    pub difficulty_max: u8,
    pub concepts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problems_per_session: Option<u32>,
}

/// The central session aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    pub meta: SessionMeta,

    /// Config snapshot taken at creation time; never mutated afterwards.
    pub config: TrainingConfig,

    /// The concrete subset this session runs through, fixed at creation.
    /// This is what keeps sessions resumable even if the global catalog
    /// changes later.
    pub problem_ids: Vec<String>,

    pub progress: TrainingProgress,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SessionSummary>,
}

impl TrainingSession {
    /// Create a new session at index 0 with a zeroed score.
    ///
    /// Timers are seeded from the config. An empty problem list completes
    /// the session immediately (`finished_at` is stamped).
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        config: TrainingConfig,
        problem_ids: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let empty = problem_ids.is_empty();

        let progress = TrainingProgress {
            current_index: 0,
            attempts_on_current: 0,
            last_answer: None,
            score: TrainingScore::default(),
            timers: TimerState {
                session_seconds_remaining: config.session_timer,
                problem_seconds_remaining: config.problem_timer,
                session_started_at: Some(now),
                problem_started_at: Some(now),
                last_tick_at: Some(now),
            },
            started_at: now,
            updated_at: now,
            finished_at: empty.then_some(now),
        };

        let summary = SessionSummary {
            difficulty_min: config.difficulty_min,
            difficulty_max: config.difficulty_max,
            concepts: config.concepts.clone(),
            problems_per_session: config.problems_per_session,
        };

        Self {
            meta: SessionMeta {
                id: id.into(),
                title: title.into(),
                created_at: now,
                last_opened_at: now,
                status: if empty {
                    SessionStatus::Completed
                } else {
                    SessionStatus::Active
                },
            },
            config,
            problem_ids,
            progress,
            summary: Some(summary),
        }
    }

    /// Whether the session has finished.
    pub fn is_completed(&self) -> bool {
        self.meta.status == SessionStatus::Completed
    }
}

/// Default title derived from the config, e.g. `Training (1-5) • pointers`.
pub fn normalize_title(config: &TrainingConfig) -> String {
    let concepts = if config.concepts.is_empty() {
        "Any concepts".to_string()
    } else {
        config.concepts.join(", ")
    };
    format!(
        "Training ({}-{}) • {}",
        config.difficulty_min, config.difficulty_max, concepts
    )
}
