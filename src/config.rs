//! Training configuration for cppdrill.
//!
//! A [`TrainingConfig`] describes how a training session is assembled and
//! scored: difficulty bounds, attempt limits, concept filters, session size,
//! timers, ordering, and display options. Configs are value objects; once a
//! session is created its config snapshot never changes.
//!
//! Default values can be overridden by `~/.cppdrill/config.toml` (or
//! `$CPPDRILL_HOME/config.toml`). Loading is fail-open: a missing or broken
//! file yields the built-in defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DrillError, FailOpen, Result};

/// Lowest problem difficulty.
pub const PROBLEM_MIN_DIFFICULTY: u8 = 1;
/// Highest problem difficulty.
pub const PROBLEM_MAX_DIFFICULTY: u8 = 5;

/// Clamp an arbitrary number into the valid difficulty range [1, 5].
pub fn clamp_difficulty(n: i64) -> u8 {
    n.clamp(PROBLEM_MIN_DIFFICULTY as i64, PROBLEM_MAX_DIFFICULTY as i64) as u8
}

/// How problems within a session are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProblemOrder {
    /// Shuffled order.
    #[default]
    Random,
    /// Sorted by ascending difficulty.
    Progressive,
}

/// Configuration for a training session.
///
/// `None` means "unbounded" for `max_attempts_per_problem` and
/// `problems_per_session`, and "disabled" for the two timers. The timers are
/// mutually exclusive; use [`TrainingConfig::set_problem_timer`] and
/// [`TrainingConfig::set_session_timer`] to keep them that way. The engine
/// assumes at most one is set and does not re-validate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
    /// Lower difficulty bound (inclusive), clamped to [1, 5].
    pub difficulty_min: u8,
    /// Upper difficulty bound (inclusive), clamped to [1, 5].
    pub difficulty_max: u8,

    /// Submissions allowed per problem before it counts as failed.
    pub max_attempts_per_problem: Option<u32>,
    /// Concept tags used as an inclusion filter (empty = no filter).
    pub concepts: Vec<String>,

    /// Number of problems per session.
    pub problems_per_session: Option<u32>,

    /// Per-problem countdown in seconds.
    pub problem_timer: Option<u32>,
    /// Whole-session countdown in seconds.
    pub session_timer: Option<u32>,

    /// Ordering of the chosen subset.
    pub problem_order: ProblemOrder,
    /// Whether the UI should highlight stdout differences.
    pub show_output_difference: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            difficulty_min: 1,
            difficulty_max: 5,
            max_attempts_per_problem: Some(3),
            concepts: Vec::new(),
            problems_per_session: None,
            problem_timer: None,
            session_timer: None,
            problem_order: ProblemOrder::Random,
            show_output_difference: true,
        }
    }
}

impl TrainingConfig {
    /// Enable or disable the per-problem timer.
    ///
    /// Enabling it clears the session timer.
    pub fn set_problem_timer(&mut self, seconds: Option<u32>) {
        self.problem_timer = seconds;
        if seconds.is_some() {
            self.session_timer = None;
        }
    }

    /// Enable or disable the whole-session timer.
    ///
    /// Enabling it clears the problem timer.
    pub fn set_session_timer(&mut self, seconds: Option<u32>) {
        self.session_timer = seconds;
        if seconds.is_some() {
            self.problem_timer = None;
        }
    }

    /// Return a copy with difficulty bounds clamped to [1, 5] and ordered
    /// so that `difficulty_min <= difficulty_max`.
    pub fn normalized(&self) -> Self {
        let mut c = self.clone();
        c.difficulty_min = clamp_difficulty(c.difficulty_min as i64);
        c.difficulty_max = clamp_difficulty(c.difficulty_max as i64);
        if c.difficulty_min > c.difficulty_max {
            std::mem::swap(&mut c.difficulty_min, &mut c.difficulty_max);
        }
        c
    }
}

/// A named configuration preset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Short name shown to the user.
    pub label: String,
    /// One-line description.
    pub description: String,
    /// The configuration this preset applies.
    pub config: TrainingConfig,
}

/// Built-in presets, mirroring the home screen choices.
pub fn presets() -> Vec<Preset> {
    vec![
        Preset {
            label: "default".to_string(),
            description: "Balanced mix for steady progress.".to_string(),
            config: TrainingConfig::default(),
        },
        Preset {
            label: "warm-up".to_string(),
            description: "Short, forgiving session.".to_string(),
            config: TrainingConfig {
                difficulty_min: 1,
                difficulty_max: 3,
                problems_per_session: Some(10),
                max_attempts_per_problem: Some(3),
                ..TrainingConfig::default()
            },
        },
        Preset {
            label: "timed-sprint".to_string(),
            description: "Fast decisions, sharp feedback.".to_string(),
            config: TrainingConfig {
                difficulty_min: 2,
                difficulty_max: 4,
                problems_per_session: Some(15),
                max_attempts_per_problem: Some(1),
                problem_timer: Some(60),
                ..TrainingConfig::default()
            },
        },
        Preset {
            label: "progressive".to_string(),
            description: "Ramps difficulty as you succeed.".to_string(),
            config: TrainingConfig {
                problems_per_session: Some(20),
                max_attempts_per_problem: Some(2),
                problem_order: ProblemOrder::Progressive,
                ..TrainingConfig::default()
            },
        },
        Preset {
            label: "endless".to_string(),
            description: "Keep going until you stop.".to_string(),
            config: TrainingConfig {
                problems_per_session: None,
                max_attempts_per_problem: None,
                ..TrainingConfig::default()
            },
        },
    ]
}

/// Look up a built-in preset by label (case-insensitive).
pub fn find_preset(label: &str) -> Option<Preset> {
    presets()
        .into_iter()
        .find(|p| p.label.eq_ignore_ascii_case(label))
}

/// Get the cppdrill home directory.
///
/// Checks the `CPPDRILL_HOME` environment variable first, then falls back
/// to `~/.cppdrill`. Invalid values are ignored with a warning.
pub fn drill_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("CPPDRILL_HOME") {
        if home.is_empty() {
            tracing::warn!("CPPDRILL_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("CPPDRILL_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".cppdrill"));
    }

    // Minimal environments without HOME fall back to the temp dir.
    let fallback = env::temp_dir().join("cppdrill");
    tracing::warn!("HOME not set, using fallback location: {}", fallback.display());
    Some(fallback)
}

/// Get the training store path.
///
/// Returns `<drill_home>/training-store.json`.
pub fn store_path() -> Option<PathBuf> {
    drill_home().map(|h| h.join("training-store.json"))
}

/// Get the default problem catalog path.
///
/// Returns `<drill_home>/problems.json`.
pub fn default_catalog_path() -> Option<PathBuf> {
    drill_home().map(|h| h.join("problems.json"))
}

/// Load the default training config.
///
/// Reads `<drill_home>/config.toml` if present; a missing or unreadable
/// file yields the built-in defaults (fail-open).
pub fn load_default_config() -> TrainingConfig {
    let Some(path) = drill_home().map(|h| h.join("config.toml")) else {
        return TrainingConfig::default();
    };
    if !path.exists() {
        return TrainingConfig::default();
    }
    load_config_file(&path).fail_open_default("loading config defaults")
}

/// Load a training config from a TOML file.
fn load_config_file(path: &Path) -> Result<TrainingConfig> {
    let content = fs::read_to_string(path).map_err(|e| DrillError::storage(path, e))?;
    let config: TrainingConfig =
        toml::from_str(&content).map_err(|e| DrillError::config(e.to_string()))?;
    Ok(config.normalized())
}
