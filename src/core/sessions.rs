//! Training session lifecycle.
//!
//! Every operation here is a read-modify-write cycle against the store
//! handle: load the document, produce a new document value, persist it only
//! if something changed. Mutating operations that address a session id fail
//! fast with [`DrillError::SessionNotFound`] when it is unknown, except
//! [`set_active_training_session`] and [`delete_training_session`], which
//! degrade to no-ops so the UI can deactivate gracefully.

use chrono::Utc;

use crate::config::TrainingConfig;
use crate::core::model::{
    normalize_title, SessionStatus, SubmissionEvaluation, TrainingSession,
};
use crate::error::{DrillError, Result};
use crate::store::{new_session_id, StorageBackend, StoreHandle, TrainingStore};

/// Parameters for [`create_training_session`].
#[derive(Debug, Clone)]
pub struct CreateSessionParams {
    /// Optional title; a default is derived from the config when empty.
    pub title: Option<String>,
    /// Config snapshot attached to the session.
    pub config: TrainingConfig,
    /// The ordered subset the session will run through. May be empty, in
    /// which case the session is completed at creation.
    pub problem_ids: Vec<String>,
    /// Whether the new session becomes the active one (default true).
    pub activate: bool,
}

impl CreateSessionParams {
    /// Create params with default activation.
    pub fn new(config: TrainingConfig, problem_ids: Vec<String>) -> Self {
        Self {
            title: None,
            config,
            problem_ids,
            activate: true,
        }
    }
}

/// What a recorded attempt concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttemptOutcome {
    /// The current problem is finished (solved, exhausted, or given up).
    pub finished_problem: bool,
    /// The session just completed.
    pub finished_session: bool,
}

fn ensure_session<'a>(store: &'a TrainingStore, id: &str) -> Result<&'a TrainingSession> {
    store
        .sessions_by_id
        .get(id)
        .ok_or_else(|| DrillError::session_not_found(id))
}

/// Create a new training session and return its id.
///
/// The config is normalized (difficulty bounds clamped and ordered) before
/// it is attached. The session becomes active unless `activate` is false.
pub fn create_training_session<B: StorageBackend>(
    store: &StoreHandle<B>,
    params: CreateSessionParams,
) -> Result<String> {
    let id = new_session_id();
    let now = Utc::now();

    let config = params.config.normalized();
    let title = params
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| normalize_title(&config));

    store.update(|prev| {
        let session = TrainingSession::new(&id, &title, config.clone(), params.problem_ids.clone(), now);

        let mut next = prev.clone();
        if params.activate {
            next.active_session_id = Some(id.clone());
        }
        next.sessions_by_id.insert(id.clone(), session);
        Ok(Some(next))
    })?;

    Ok(id)
}

/// Record one submitted guess against the current problem.
///
/// Always increments the attempt counters. A success solves the problem
/// (with a first-try bonus when it was the first submission); a failure
/// counts against the score only when attempts are exhausted
/// (`max_attempts_per_problem`, `None` = never) or the user gave up. Either
/// way a finished problem advances the cursor, resets the per-problem
/// attempt count, and reseeds the problem timer; finishing the last problem
/// completes the session.
pub fn record_attempt<B: StorageBackend>(
    store: &StoreHandle<B>,
    session_id: &str,
    evaluation: SubmissionEvaluation,
) -> Result<AttemptOutcome> {
    let mut outcome = AttemptOutcome::default();

    store.update(|prev| {
        let s = ensure_session(prev, session_id)?;
        let now = Utc::now();

        let current_index = s.progress.current_index;
        let at_last_problem = current_index + 1 >= s.problem_ids.len();

        let attempts_on_current = s.progress.attempts_on_current + 1;

        let mut session = s.clone();
        session.progress.updated_at = now;
        session.progress.attempts_on_current = attempts_on_current;
        session.progress.score.attempts_total += 1;

        if evaluation.success {
            outcome.finished_problem = true;
            session.progress.score.solved += 1;
            if attempts_on_current == 1 {
                session.progress.score.correct_on_first_try += 1;
            }
        } else {
            let exhausted = s
                .config
                .max_attempts_per_problem
                .is_some_and(|max| attempts_on_current >= max);
            if exhausted || evaluation.give_up {
                outcome.finished_problem = true;
                session.progress.score.failed += 1;
            }
        }

        session.progress.last_answer = Some(evaluation);

        // Reseed the per-problem countdown; the anchor re-establishes on
        // the next tick.
        session.progress.timers.problem_seconds_remaining = s.config.problem_timer;
        session.progress.timers.last_tick_at = None;

        if outcome.finished_problem {
            session.meta.last_opened_at = now;
            session.progress.attempts_on_current = 0;
            if at_last_problem {
                outcome.finished_session = true;
                session.meta.status = SessionStatus::Completed;
                session.progress.current_index = session.problem_ids.len();
                session.progress.finished_at = Some(now);
            } else {
                session.progress.current_index = current_index + 1;
            }
        }

        let mut next = prev.clone();
        next.sessions_by_id.insert(session_id.to_string(), session);
        Ok(Some(next))
    })?;

    Ok(outcome)
}

/// Rewind the session by one problem and return the problem id to redo.
///
/// Undoes the score contribution of the single most recent completion,
/// based on `last_answer` and clamped at zero. This is deliberately a
/// one-step rewind, not an undo stack: retrying repeatedly does not restore
/// earlier contributions. Reactivates a completed session. Rewinding past
/// the session start is a no-op returning `None`.
pub fn retry_last_problem<B: StorageBackend>(
    store: &StoreHandle<B>,
    session_id: &str,
) -> Result<Option<String>> {
    let mut target: Option<String> = None;

    store.update(|prev| {
        let s = ensure_session(prev, session_id)?;
        let now = Utc::now();

        let current_index = s.progress.current_index;
        if current_index == 0 {
            return Ok(None);
        }

        let last_success = s
            .progress
            .last_answer
            .as_ref()
            .map(|a| a.success)
            .unwrap_or(false);

        let next_index = current_index - 1;

        let mut session = s.clone();
        session.meta.status = SessionStatus::Active;
        session.meta.last_opened_at = now;
        session.progress.updated_at = now;
        session.progress.current_index = next_index;
        session.progress.attempts_on_current = 0;
        session.progress.last_answer = None;

        if last_success {
            session.progress.score.solved = s.progress.score.solved.saturating_sub(1);
        } else {
            session.progress.score.failed = s.progress.score.failed.saturating_sub(1);
        }

        session.progress.timers.problem_seconds_remaining = s.config.problem_timer;
        session.progress.timers.last_tick_at = None;

        target = session.problem_ids.get(next_index).cloned();

        let mut next = prev.clone();
        next.sessions_by_id.insert(session_id.to_string(), session);
        Ok(Some(next))
    })?;

    Ok(target)
}

/// Reopen a non-completed session and make it the active one.
///
/// Refreshes `last_opened_at` and re-anchors the timer tick to now, so a
/// stale anchor from a closed session cannot burst-count elapsed time.
/// Calling it on a completed session is a no-op.
pub fn resume_training_session<B: StorageBackend>(
    store: &StoreHandle<B>,
    session_id: &str,
) -> Result<()> {
    store.update(|prev| {
        let s = ensure_session(prev, session_id)?;

        if s.is_completed() {
            return Ok(None);
        }

        let now = Utc::now();

        let mut session = s.clone();
        session.meta.status = SessionStatus::Active;
        session.meta.last_opened_at = now;
        session.progress.updated_at = now;
        session.progress.timers.last_tick_at = Some(now);

        let mut next = prev.clone();
        next.active_session_id = Some(session_id.to_string());
        next.sessions_by_id.insert(session_id.to_string(), session);
        Ok(Some(next))
    })?;

    Ok(())
}

/// Mark a session completed.
///
/// Stamps `finished_at` only if unset and moves the cursor past the end of
/// the problem list, so "completed" and "cursor at the end" stay in step.
pub fn mark_session_completed<B: StorageBackend>(
    store: &StoreHandle<B>,
    session_id: &str,
) -> Result<()> {
    store.update(|prev| {
        let s = ensure_session(prev, session_id)?;
        let now = Utc::now();

        let mut session = s.clone();
        session.meta.status = SessionStatus::Completed;
        session.meta.last_opened_at = now;
        session.progress.updated_at = now;
        session.progress.current_index = session.problem_ids.len();
        session.progress.attempts_on_current = 0;
        session.progress.finished_at = s.progress.finished_at.or(Some(now));

        let mut next = prev.clone();
        next.sessions_by_id.insert(session_id.to_string(), session);
        Ok(Some(next))
    })?;

    Ok(())
}

/// Update the store's active-session pointer.
///
/// A non-null id that is unknown or references a completed session is
/// silently ignored; `None` always clears the pointer.
pub fn set_active_training_session<B: StorageBackend>(
    store: &StoreHandle<B>,
    session_id: Option<&str>,
) -> Result<()> {
    store.update(|prev| {
        if let Some(id) = session_id {
            match prev.sessions_by_id.get(id) {
                Some(s) if !s.is_completed() => {}
                _ => return Ok(None),
            }
        }

        let next_active = session_id.map(str::to_string);
        if prev.active_session_id == next_active {
            return Ok(None);
        }

        let mut next = prev.clone();
        next.active_session_id = next_active;
        Ok(Some(next))
    })?;

    Ok(())
}

/// Remove a session from the store.
///
/// Clears the active pointer when it referenced the deleted session.
/// Deleting an unknown id is a no-op.
pub fn delete_training_session<B: StorageBackend>(
    store: &StoreHandle<B>,
    session_id: &str,
) -> Result<()> {
    store.update(|prev| {
        if !prev.sessions_by_id.contains_key(session_id) {
            return Ok(None);
        }

        let mut next = prev.clone();
        next.sessions_by_id.remove(session_id);
        if next.active_session_id.as_deref() == Some(session_id) {
            next.active_session_id = None;
        }
        Ok(Some(next))
    })?;

    Ok(())
}

/// All sessions, most recently opened first.
pub fn list_training_sessions<B: StorageBackend>(store: &StoreHandle<B>) -> Vec<TrainingSession> {
    let doc = store.load();
    let mut sessions: Vec<TrainingSession> = doc.sessions_by_id.into_values().collect();
    sessions.sort_by(|a, b| b.meta.last_opened_at.cmp(&a.meta.last_opened_at));
    sessions
}

/// Look up a session by id.
pub fn get_training_session<B: StorageBackend>(
    store: &StoreHandle<B>,
    session_id: &str,
) -> Option<TrainingSession> {
    store.load().sessions_by_id.get(session_id).cloned()
}

/// The id of the active session, if any.
pub fn get_active_training_session_id<B: StorageBackend>(store: &StoreHandle<B>) -> Option<String> {
    store.load().active_session_id
}

/// The active session, if any.
pub fn get_active_training_session<B: StorageBackend>(
    store: &StoreHandle<B>,
) -> Option<TrainingSession> {
    let doc = store.load();
    let id = doc.active_session_id.as_deref()?;
    doc.sessions_by_id.get(id).cloned()
}
