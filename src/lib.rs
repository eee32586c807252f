//! cppdrill - Guess-the-output C++ training sessions
//!
//! cppdrill runs timed drills over a catalog of C++ snippets: pick a
//! difficulty range and concepts, guess each program's outcome and stdout,
//! and track your score across sessions. All state lives in a single
//! versioned JSON document behind a pluggable storage backend.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod store;
pub mod util;

pub use catalog::{validate_guess, ErrorType, ProblemCatalog, ProblemData, ProblemResult};
pub use config::{find_preset, presets, Preset, ProblemOrder, TrainingConfig};
pub use core::{
    SessionStatus, SubmissionEvaluation, TickResult, TimerKind, TrainingSession, UserSubmission,
};
pub use error::{DrillError, Result};
pub use store::{FileBackend, MemoryBackend, StorageBackend, StoreHandle, TrainingStore};

// CLI commands
pub use cli::{
    ActivateCommand, AnswerCommand, CompleteCommand, DeleteCommand, NewCommand, ResumeCommand,
    RetryCommand, SessionsCommand, StatusCommand, TickCommand,
};
