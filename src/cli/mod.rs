//! CLI commands for cppdrill.
//!
//! This module provides CLI commands, organized into:
//! - **Session commands**: new, resume, complete, activate, delete
//! - **Drill commands**: answer, retry, tick
//! - **Inspection commands**: sessions, status

// Session commands
pub mod activate;
pub mod complete;
pub mod delete;
pub mod new;
pub mod resume;

// Drill commands
pub mod answer;
pub mod retry;
pub mod tick;

// Inspection commands
pub mod sessions;
pub mod status;

pub use activate::ActivateCommand;
pub use answer::AnswerCommand;
pub use complete::CompleteCommand;
pub use delete::DeleteCommand;
pub use new::NewCommand;
pub use resume::ResumeCommand;
pub use retry::RetryCommand;
pub use sessions::SessionsCommand;
pub use status::StatusCommand;
pub use tick::TickCommand;
