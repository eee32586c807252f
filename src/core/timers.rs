//! Wall-clock countdown for session and problem timers.
//!
//! Timers are not background tasks; they are a pure function of stored
//! state and the clock. A caller ticks whenever it wants fresh numbers and
//! the engine works out how many whole seconds elapsed since the stored
//! anchor (`last_tick_at`). Only whole seconds are consumed: the anchor
//! advances by the consumed amount rather than snapping to now, so
//! sub-second remainders accumulate across ticks instead of being lost.
//!
//! Expiry is edge-triggered. A tick reports `expired` only when it drives
//! a counter from a positive value to zero; later ticks on an already-zero
//! counter stay quiet, so the caller acts on an expiry exactly once.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::model::TrainingSession;
use crate::error::{DrillError, Result};
use crate::store::{StorageBackend, StoreHandle};

/// Which countdown fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    Session,
    Problem,
}

/// Outcome of a single tick.
#[derive(Debug, Clone, Default)]
pub struct TickResult {
    /// The session after the tick, when it exists.
    pub session: Option<TrainingSession>,
    /// A counter crossed from positive to zero during this tick.
    pub expired: bool,
    /// Which counter crossed, when `expired` is set.
    pub expired_kind: Option<TimerKind>,
}

/// Tick a session's timers against the current wall clock.
pub fn tick<B: StorageBackend>(store: &StoreHandle<B>, session_id: &str) -> Result<TickResult> {
    tick_at(store, session_id, Utc::now())
}

/// Tick a session's timers against an explicit clock reading.
///
/// Completed sessions never tick. When both counters are configured the
/// session timer wins; the config setters keep them mutually exclusive,
/// but stored documents are not trusted to.
pub fn tick_at<B: StorageBackend>(
    store: &StoreHandle<B>,
    session_id: &str,
    now: DateTime<Utc>,
) -> Result<TickResult> {
    let mut result = TickResult::default();

    store.update(|prev| {
        let s = prev
            .sessions_by_id
            .get(session_id)
            .ok_or_else(|| DrillError::session_not_found(session_id))?;

        if s.is_completed() {
            result.session = Some(s.clone());
            return Ok(None);
        }

        let anchor = s.progress.timers.last_tick_at.unwrap_or(now);
        let delta_seconds = (now - anchor).num_seconds();

        // Under a whole second since the anchor: leave it in place so the
        // remainder keeps accumulating. A session without an anchor still
        // writes one, otherwise a timer could never start counting.
        if delta_seconds <= 0 && s.progress.timers.last_tick_at.is_some() {
            result.session = Some(s.clone());
            return Ok(None);
        }

        let delta_seconds = delta_seconds.max(0);
        let consumed = u32::try_from(delta_seconds).unwrap_or(u32::MAX);

        let mut session = s.clone();
        session.meta.last_opened_at = now;
        session.progress.updated_at = now;
        session.progress.timers.last_tick_at = Some(anchor + Duration::seconds(delta_seconds));

        let timers = &mut session.progress.timers;
        if let Some(prev_remaining) = timers.session_seconds_remaining {
            let next = prev_remaining.saturating_sub(consumed);
            timers.session_seconds_remaining = Some(next);
            if prev_remaining > 0 && next == 0 {
                result.expired = true;
                result.expired_kind = Some(TimerKind::Session);
            }
        } else if let Some(prev_remaining) = timers.problem_seconds_remaining {
            let next = prev_remaining.saturating_sub(consumed);
            timers.problem_seconds_remaining = Some(next);
            if prev_remaining > 0 && next == 0 {
                result.expired = true;
                result.expired_kind = Some(TimerKind::Problem);
            }
        }

        result.session = Some(session.clone());

        let mut next = prev.clone();
        next.sessions_by_id.insert(session_id.to_string(), session);
        Ok(Some(next))
    })?;

    Ok(result)
}
