//! New command for cppdrill.
//!
//! Assembles a session config from a preset plus flag overrides, selects a
//! problem subset from the catalog, and creates the session.

use serde::{Deserialize, Serialize};

use crate::catalog::ProblemCatalog;
use crate::config::{find_preset, load_default_config, ProblemOrder, TrainingConfig};
use crate::core::{
    create_training_session, current_problem_id, get_training_session, CreateSessionParams,
};
use crate::store::{StorageBackend, StoreHandle};

/// Options for the new command.
#[derive(Debug, Clone, Default)]
pub struct NewOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Preset label to start from; the config-file defaults when absent.
    pub preset: Option<String>,
    /// Session title; derived from the config when absent.
    pub title: Option<String>,
    /// Lower difficulty bound override.
    pub difficulty_min: Option<u8>,
    /// Upper difficulty bound override.
    pub difficulty_max: Option<u8>,
    /// Concept filter override.
    pub concepts: Option<Vec<String>>,
    /// Session size override (0 = all matching problems).
    pub count: Option<u32>,
    /// Attempt limit override (0 = unlimited).
    pub max_attempts: Option<u32>,
    /// Per-problem timer override in seconds (0 = disabled).
    pub problem_timer: Option<u32>,
    /// Whole-session timer override in seconds (0 = disabled).
    pub session_timer: Option<u32>,
    /// Ordering override.
    pub order: Option<ProblemOrder>,
    /// Do not make the new session active.
    pub no_activate: bool,
}

impl NewOptions {
    /// Resolve the effective config: preset (or config-file defaults) plus
    /// flag overrides. Zero-valued limits and timers mean "off".
    pub fn resolve_config(&self) -> Result<TrainingConfig, String> {
        let mut config = match &self.preset {
            Some(label) => {
                find_preset(label)
                    .ok_or_else(|| format!("Unknown preset: {}", label))?
                    .config
            }
            None => load_default_config(),
        };

        if let Some(min) = self.difficulty_min {
            config.difficulty_min = min;
        }
        if let Some(max) = self.difficulty_max {
            config.difficulty_max = max;
        }
        if let Some(concepts) = &self.concepts {
            config.concepts = concepts.clone();
        }
        if let Some(count) = self.count {
            config.problems_per_session = (count > 0).then_some(count);
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts_per_problem = (max_attempts > 0).then_some(max_attempts);
        }
        if let Some(seconds) = self.problem_timer {
            config.set_problem_timer((seconds > 0).then_some(seconds));
        }
        if let Some(seconds) = self.session_timer {
            config.set_session_timer((seconds > 0).then_some(seconds));
        }
        if let Some(order) = self.order {
            config.problem_order = order;
        }

        Ok(config)
    }
}

/// Output format for the new command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOutput {
    /// Whether the command was successful.
    pub success: bool,
    /// Id of the created session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Title of the created session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Number of problems selected.
    pub problem_count: usize,
    /// First problem on deck, when the session is not empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_problem_id: Option<String>,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NewOutput {
    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: None,
            title: None,
            problem_count: 0,
            first_problem_id: None,
            error: Some(error.into()),
        }
    }

    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if !self.success {
            return format!(
                "New session failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = vec![format!(
            "Created session {} ({}, {} problems)",
            self.session_id.as_deref().unwrap_or("?"),
            self.title.as_deref().unwrap_or("?"),
            self.problem_count
        )];

        match &self.first_problem_id {
            Some(id) => lines.push(format!("First problem: {}", id)),
            None => lines.push("No problems matched; session is already complete.".to_string()),
        }

        lines.join("\n")
    }
}

/// The new command implementation.
pub struct NewCommand<B: StorageBackend> {
    store: StoreHandle<B>,
    catalog: ProblemCatalog,
}

impl<B: StorageBackend> NewCommand<B> {
    /// Create a new new-session command.
    pub fn new(store: StoreHandle<B>, catalog: ProblemCatalog) -> Self {
        Self { store, catalog }
    }

    /// Run the new command.
    pub fn run(&self, options: &NewOptions) -> NewOutput {
        let config = match options.resolve_config() {
            Ok(config) => config.normalized(),
            Err(e) => return NewOutput::failure(e),
        };

        let problem_ids = self.catalog.build_subset_ids(&config);
        let problem_count = problem_ids.len();

        let params = CreateSessionParams {
            title: options.title.clone(),
            config,
            problem_ids,
            activate: !options.no_activate,
        };

        let session_id = match create_training_session(&self.store, params) {
            Ok(id) => id,
            Err(e) => return NewOutput::failure(format!("Failed to create session: {}", e)),
        };

        let session = get_training_session(&self.store, &session_id);

        NewOutput {
            success: true,
            title: session.as_ref().map(|s| s.meta.title.clone()),
            first_problem_id: current_problem_id(session.as_ref()),
            session_id: Some(session_id),
            problem_count,
            error: None,
        }
    }

    /// Format output according to options.
    pub fn format_output(&self, output: &NewOutput, options: &NewOptions) -> String {
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
