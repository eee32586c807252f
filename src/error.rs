//! Unified error types for cppdrill.
//!
//! Storage-level corruption never surfaces as an error: an unreadable or
//! stale store document degrades to an empty one, so the user starts fresh
//! instead of seeing a technical failure. Mutating operations that address
//! a session id, on the other hand, fail fast when the session is unknown.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for cppdrill operations.
#[derive(Error, Debug)]
pub enum DrillError {
    /// I/O errors from store or catalog file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Training session not found in the store.
    #[error("training session not found: {session_id}")]
    SessionNotFound { session_id: String },

    /// Problem not present in the catalog.
    #[error("unknown problem: {problem_id}")]
    ProblemNotFound { problem_id: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Catalog loading or validation errors.
    #[error("catalog error: {message}")]
    Catalog { message: String },
}

/// A specialized Result type for cppdrill operations.
pub type Result<T> = std::result::Result<T, DrillError>;

impl DrillError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a session not found error.
    pub fn session_not_found(session_id: impl Into<String>) -> Self {
        Self::SessionNotFound {
            session_id: session_id.into(),
        }
    }

    /// Create a problem not found error.
    pub fn problem_not_found(problem_id: impl Into<String>) -> Self {
        Self::ProblemNotFound {
            problem_id: problem_id.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a catalog error.
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }
}

impl From<io::Error> for DrillError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for DrillError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Infrastructure errors (a missing home directory, an unreadable defaults
/// file) should not stop a drill: log a warning and continue with a safe
/// default.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = DrillError::storage(
            "/tmp/store.json",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("/tmp/store.json"));
    }

    #[test]
    fn test_session_not_found_display() {
        let err = DrillError::session_not_found("ts_abc");
        assert_eq!(err.to_string(), "training session not found: ts_abc");
    }

    #[test]
    fn test_problem_not_found_display() {
        let err = DrillError::problem_not_found("p0042");
        assert_eq!(err.to_string(), "unknown problem: p0042");
    }

    #[test]
    fn test_config_error_display() {
        let err = DrillError::config("invalid TOML");
        assert_eq!(err.to_string(), "config error: invalid TOML");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: DrillError = io_err.into();
        assert!(matches!(err, DrillError::Storage { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: DrillError = json_err.into();
        assert!(matches!(err, DrillError::Serde { .. }));
    }

    #[test]
    fn test_fail_open_default() {
        let result: Result<Vec<String>> = Err(DrillError::config("broken"));
        let value = result.fail_open_default("loading defaults");
        assert!(value.is_empty());
    }

    #[test]
    fn test_fail_open_with() {
        let result: Result<i32> = Err(DrillError::config("broken"));
        let value = result.fail_open_with("loading defaults", 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_fail_open_success_passthrough() {
        let result: Result<i32> = Ok(100);
        assert_eq!(result.fail_open_default("context"), 100);
    }
}
