//! Problem catalog for cppdrill.
//!
//! The catalog is a static JSON file of problems (code snippet, difficulty,
//! concept tags, expected outcome, explanation), produced by an external
//! generator. cppdrill only reads it: the session engine consumes problem
//! ids and never mutates the catalog.

use std::collections::HashMap;
use std::path::Path;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::{ProblemOrder, TrainingConfig};
use crate::core::{SubmissionEvaluation, UserSubmission};
use crate::error::{DrillError, Result};
use crate::util::{intersects, read_to_string_limited};

/// How a problem's program behaves when compiled and run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorType {
    /// Runs successfully; the exact stdout is the answer.
    #[default]
    NoError,
    /// Compiles but fails at runtime (crash, abort, exception).
    RuntimeError,
    /// Fails to compile.
    CompilationError,
    /// The standard does not specify the result.
    UndefinedBehavior,
}

impl ErrorType {
    /// Human-readable label, as shown in answer panels.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorType::NoError => "No error",
            ErrorType::RuntimeError => "Runtime error",
            ErrorType::CompilationError => "Compilation error",
            ErrorType::UndefinedBehavior => "Undefined behavior",
        }
    }
}

/// Color of a diagnostic span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMessageColor {
    #[default]
    Default,
    Red,
    Yellow,
    Cyan,
    Green,
}

/// Style of a diagnostic span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMessageStyle {
    #[default]
    Normal,
    Bold,
    Italic,
}

/// One styled span of a compiler/runtime diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessagePart {
    pub color: ErrorMessageColor,
    pub style: ErrorMessageStyle,
    pub text: String,
}

/// Expected outcome of a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemResult {
    /// Classification of the outcome.
    pub error_type: ErrorType,
    /// Exact stdout, meaningful only for [`ErrorType::NoError`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    /// Styled diagnostic text for error outcomes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<Vec<ErrorMessagePart>>,
}

/// One code-prediction exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemData {
    pub id: String,
    pub title: String,
    pub code: String,
    /// Difficulty in [1, 5].
    pub difficulty: u8,
    pub concepts: Vec<String>,
    pub explanation: String,
    /// Input piped to the program, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdin: Option<String>,
    pub result: ProblemResult,
}

/// An in-memory problem catalog with by-id lookup.
#[derive(Debug, Clone, Default)]
pub struct ProblemCatalog {
    problems: Vec<ProblemData>,
    by_id: HashMap<String, usize>,
}

impl ProblemCatalog {
    /// Build a catalog from a list of problems.
    ///
    /// Later duplicates of an id shadow earlier ones.
    pub fn new(problems: Vec<ProblemData>) -> Self {
        let by_id = problems
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        Self { problems, by_id }
    }

    /// Load a catalog from a JSON file (an array of problems).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = read_to_string_limited(path)?;
        let problems: Vec<ProblemData> = serde_json::from_str(&raw)
            .map_err(|e| DrillError::catalog(format!("{}: {}", path.display(), e)))?;
        Ok(Self::new(problems))
    }

    /// Look up a problem by id.
    pub fn get(&self, id: &str) -> Option<&ProblemData> {
        self.by_id.get(id).map(|&i| &self.problems[i])
    }

    /// Look up a problem by id, failing when it is absent.
    pub fn require(&self, id: &str) -> Result<&ProblemData> {
        self.get(id).ok_or_else(|| DrillError::problem_not_found(id))
    }

    /// All problems, in catalog order.
    pub fn problems(&self) -> &[ProblemData] {
        &self.problems
    }

    /// Number of problems in the catalog.
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// All distinct concept tags, sorted.
    pub fn concepts(&self) -> Vec<String> {
        let mut all: Vec<String> = self
            .problems
            .iter()
            .flat_map(|p| p.concepts.iter().cloned())
            .collect();
        all.sort();
        all.dedup();
        all
    }

    /// Build the ordered subset of problem ids for a session.
    ///
    /// Filters by difficulty bounds and concept tags, shuffles so that a
    /// size limit picks a random sample, truncates to `problems_per_session`,
    /// then applies the configured ordering.
    pub fn build_subset_ids(&self, config: &TrainingConfig) -> Vec<String> {
        let mut rng = rand::thread_rng();
        self.build_subset_ids_with(config, &mut rng)
    }

    /// [`ProblemCatalog::build_subset_ids`] with an explicit RNG, for
    /// deterministic tests.
    pub fn build_subset_ids_with<R: rand::Rng>(
        &self,
        config: &TrainingConfig,
        rng: &mut R,
    ) -> Vec<String> {
        let mut filtered: Vec<&ProblemData> = self
            .problems
            .iter()
            .filter(|p| {
                p.difficulty >= config.difficulty_min
                    && p.difficulty <= config.difficulty_max
                    && intersects(&config.concepts, &p.concepts)
            })
            .collect();

        // Shuffle before the size limit so a limited session is a random
        // sample, not a catalog prefix.
        filtered.shuffle(rng);

        if let Some(limit) = config.problems_per_session {
            filtered.truncate(limit as usize);
        }

        match config.problem_order {
            ProblemOrder::Random => filtered.shuffle(rng),
            ProblemOrder::Progressive => filtered.sort_by_key(|p| p.difficulty),
        }

        filtered.into_iter().map(|p| p.id.clone()).collect()
    }
}

/// Evaluate a user submission against a problem's expected outcome.
///
/// Stdout is compared exactly (including spaces and newlines), and only
/// when the expected outcome is [`ErrorType::NoError`].
pub fn validate_guess(problem: &ProblemData, submission: &UserSubmission) -> SubmissionEvaluation {
    let expected = &problem.result;

    let error_type_matches = submission.error_type == expected.error_type;
    let output_is_relevant = expected.error_type == ErrorType::NoError;
    let output_matches = !output_is_relevant
        || submission.stdout.as_deref().unwrap_or("") == expected.stdout.as_deref().unwrap_or("");

    let success = error_type_matches && output_matches;

    let summary = if !error_type_matches {
        format!(
            "Wrong outcome: you selected \"{}\", which is incorrect.",
            submission.error_type.label()
        )
    } else if output_is_relevant && !output_matches {
        "Stdout mismatch: output must match exactly (including spaces and newlines).".to_string()
    } else if output_is_relevant {
        "Perfect match: error type and stdout are correct.".to_string()
    } else {
        "Outcome matches: no stdout is expected for this problem.".to_string()
    };

    SubmissionEvaluation {
        success,
        give_up: false,
        summary,
        submission: Some(submission.clone()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use tempfile::TempDir;

    pub(crate) fn problem(id: &str, difficulty: u8, concepts: &[&str]) -> ProblemData {
        ProblemData {
            id: id.to_string(),
            title: format!("Problem {id}"),
            code: "int main() { return 0; }".to_string(),
            difficulty,
            concepts: concepts.iter().map(|c| c.to_string()).collect(),
            explanation: "Explanation.".to_string(),
            stdin: None,
            result: ProblemResult {
                error_type: ErrorType::NoError,
                stdout: Some("42\n".to_string()),
                error_message: None,
            },
        }
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = ProblemCatalog::new(vec![problem("p1", 1, &[]), problem("p2", 3, &[])]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("p2").unwrap().difficulty, 3);
        assert!(catalog.get("p9").is_none());
    }

    #[test]
    fn test_catalog_concepts_sorted_deduped() {
        let catalog = ProblemCatalog::new(vec![
            problem("p1", 1, &["pointers", "lambdas"]),
            problem("p2", 2, &["lambdas"]),
        ]);

        assert_eq!(catalog.concepts(), vec!["lambdas", "pointers"]);
    }

    #[test]
    fn test_load_from_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("problems.json");

        let json = serde_json::to_string(&vec![problem("p1", 2, &["refs"])]).unwrap();
        fs::write(&path, json).unwrap();

        let catalog = ProblemCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("p1").unwrap().concepts, vec!["refs"]);
    }

    #[test]
    fn test_load_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("problems.json");
        fs::write(&path, "not json").unwrap();

        assert!(ProblemCatalog::load(&path).is_err());
    }

    #[test]
    fn test_problem_json_field_names() {
        let p = ProblemData {
            result: ProblemResult {
                error_type: ErrorType::CompilationError,
                stdout: None,
                error_message: Some(vec![ErrorMessagePart {
                    color: ErrorMessageColor::Red,
                    style: ErrorMessageStyle::Bold,
                    text: "error: expected ';'".to_string(),
                }]),
            },
            ..problem("p1", 4, &[])
        };

        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"errorType\":\"compilation-error\""));
        assert!(json.contains("\"errorMessage\""));

        let back: ProblemData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_subset_filters_by_difficulty_and_concepts() {
        let catalog = ProblemCatalog::new(vec![
            problem("easy", 1, &["pointers"]),
            problem("mid", 3, &["pointers"]),
            problem("hard", 5, &["pointers"]),
            problem("off-topic", 3, &["lambdas"]),
        ]);

        let config = TrainingConfig {
            difficulty_min: 2,
            difficulty_max: 4,
            concepts: vec!["pointers".to_string()],
            ..TrainingConfig::default()
        };

        let mut rng = StdRng::seed_from_u64(7);
        let ids = catalog.build_subset_ids_with(&config, &mut rng);
        assert_eq!(ids, vec!["mid"]);
    }

    #[test]
    fn test_subset_respects_size_limit() {
        let problems: Vec<ProblemData> = (0..20)
            .map(|i| problem(&format!("p{i}"), 3, &[]))
            .collect();
        let catalog = ProblemCatalog::new(problems);

        let config = TrainingConfig {
            problems_per_session: Some(5),
            ..TrainingConfig::default()
        };

        let mut rng = StdRng::seed_from_u64(7);
        let ids = catalog.build_subset_ids_with(&config, &mut rng);
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_subset_progressive_orders_by_difficulty() {
        let catalog = ProblemCatalog::new(vec![
            problem("d5", 5, &[]),
            problem("d1", 1, &[]),
            problem("d3", 3, &[]),
        ]);

        let config = TrainingConfig {
            problem_order: ProblemOrder::Progressive,
            ..TrainingConfig::default()
        };

        let mut rng = StdRng::seed_from_u64(7);
        let ids = catalog.build_subset_ids_with(&config, &mut rng);
        assert_eq!(ids, vec!["d1", "d3", "d5"]);
    }

    #[test]
    fn test_validate_guess_exact_match() {
        let p = problem("p1", 1, &[]);
        let eval = validate_guess(
            &p,
            &UserSubmission {
                error_type: ErrorType::NoError,
                stdout: Some("42\n".to_string()),
            },
        );

        assert!(eval.success);
        assert!(!eval.give_up);
        assert!(eval.summary.starts_with("Perfect match"));
    }

    #[test]
    fn test_validate_guess_wrong_error_type() {
        let p = problem("p1", 1, &[]);
        let eval = validate_guess(
            &p,
            &UserSubmission {
                error_type: ErrorType::RuntimeError,
                stdout: None,
            },
        );

        assert!(!eval.success);
        assert!(eval.summary.contains("Runtime error"));
    }

    #[test]
    fn test_validate_guess_stdout_mismatch() {
        let p = problem("p1", 1, &[]);
        let eval = validate_guess(
            &p,
            &UserSubmission {
                error_type: ErrorType::NoError,
                stdout: Some("42".to_string()), // missing trailing newline
            },
        );

        assert!(!eval.success);
        assert!(eval.summary.contains("Stdout mismatch"));
    }

    #[test]
    fn test_validate_guess_error_outcome_ignores_stdout() {
        let p = ProblemData {
            result: ProblemResult {
                error_type: ErrorType::UndefinedBehavior,
                stdout: None,
                error_message: None,
            },
            ..problem("p1", 1, &[])
        };

        let eval = validate_guess(
            &p,
            &UserSubmission {
                error_type: ErrorType::UndefinedBehavior,
                stdout: Some("whatever".to_string()),
            },
        );

        assert!(eval.success);
        assert!(eval.summary.starts_with("Outcome matches"));
    }
}
