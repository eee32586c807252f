//! Core types and logic for cppdrill.
//!
//! This module contains the session aggregate, the lifecycle operations
//! that drive it, derived read-only queries, and the countdown timer
//! engine.

pub mod model;
pub mod queries;
pub mod sessions;
pub mod timers;

pub use model::{
    normalize_title, SessionMeta, SessionStatus, SessionSummary, SubmissionEvaluation,
    TimerState, TrainingProgress, TrainingScore, TrainingSession, UserSubmission,
};
pub use queries::{
    concepts, current_problem_id, difficulty_range, next_problem_id, session_counts,
    SessionCounts,
};
pub use sessions::{
    create_training_session, delete_training_session, get_active_training_session,
    get_active_training_session_id, get_training_session, list_training_sessions,
    mark_session_completed, record_attempt, resume_training_session, retry_last_problem,
    set_active_training_session, AttemptOutcome, CreateSessionParams,
};
pub use timers::{tick, tick_at, TickResult, TimerKind};
