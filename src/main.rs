//! cppdrill - Guess-the-output C++ training sessions
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use cppdrill::catalog::{ErrorType, ProblemCatalog};
use cppdrill::config::{default_catalog_path, drill_home, ProblemOrder};
use cppdrill::error::DrillError;
use cppdrill::store::{FileBackend, StoreHandle};

// =============================================================================
// CLI Definition
// =============================================================================

/// cppdrill - Guess-the-output C++ training sessions
#[derive(Parser)]
#[command(name = "cppdrill")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the problem catalog (JSON array of problems)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a training session over the problem catalog
    New {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Preset to start from (default, warm-up, timed-sprint, progressive, endless)
        #[arg(long)]
        preset: Option<String>,
        /// Session title
        #[arg(long)]
        title: Option<String>,
        /// Minimum difficulty (1-5)
        #[arg(long)]
        difficulty_min: Option<u8>,
        /// Maximum difficulty (1-5)
        #[arg(long)]
        difficulty_max: Option<u8>,
        /// Concept filter (repeatable)
        #[arg(long = "concept")]
        concepts: Vec<String>,
        /// Number of problems to select (0 = all matching)
        #[arg(long)]
        count: Option<u32>,
        /// Attempts allowed per problem (0 = unlimited)
        #[arg(long)]
        max_attempts: Option<u32>,
        /// Per-problem countdown in seconds
        #[arg(long)]
        problem_timer: Option<u32>,
        /// Whole-session countdown in seconds
        #[arg(long)]
        session_timer: Option<u32>,
        /// Problem ordering
        #[arg(long, value_enum)]
        order: Option<OrderArg>,
        /// Do not make the new session active
        #[arg(long)]
        no_activate: bool,
    },

    /// List training sessions
    Sessions {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Maximum number of sessions to show
        #[arg(long, short, default_value_t = 20)]
        limit: usize,
    },

    /// Show a session's position, score and timers
    Status {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Session ID to inspect (defaults to the active session)
        #[arg(long)]
        session_id: Option<String>,
    },

    /// Submit a guess for the current problem
    Answer {
        /// The guessed outcome
        #[arg(value_enum)]
        outcome: Option<OutcomeArg>,
        /// The guessed stdout (only with a no-error outcome)
        #[arg(long)]
        stdout: Option<String>,
        /// Concede the problem instead of guessing
        #[arg(long)]
        give_up: bool,
        /// Session ID to use (defaults to the active session)
        #[arg(long)]
        session_id: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Rewind one problem to redo it
    Retry {
        /// Session ID to use (defaults to the active session)
        #[arg(long)]
        session_id: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Reopen a session and make it active
    Resume {
        /// Session ID to resume
        session_id: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Mark a session completed
    Complete {
        /// Session ID to use (defaults to the active session)
        #[arg(long)]
        session_id: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Set or clear the active session
    Activate {
        /// Session ID to activate (omit to clear)
        session_id: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Delete a session
    Delete {
        /// Session ID to delete
        session_id: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Advance a session's timers and act on expiry
    Tick {
        /// Session ID to use (defaults to the active session)
        #[arg(long)]
        session_id: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

/// Guessed outcome, as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutcomeArg {
    NoError,
    RuntimeError,
    CompilationError,
    UndefinedBehavior,
}

impl From<OutcomeArg> for ErrorType {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::NoError => ErrorType::NoError,
            OutcomeArg::RuntimeError => ErrorType::RuntimeError,
            OutcomeArg::CompilationError => ErrorType::CompilationError,
            OutcomeArg::UndefinedBehavior => ErrorType::UndefinedBehavior,
        }
    }
}

/// Problem ordering, as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OrderArg {
    Random,
    Progressive,
}

impl From<OrderArg> for ProblemOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Random => ProblemOrder::Random,
            OrderArg::Progressive => ProblemOrder::Progressive,
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("cppdrill error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Set up the global panic handler.
///
/// On panic, logs to ~/.cppdrill/crash.log and exits non-zero, so a crash
/// leaves a trace even when stderr is lost.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("cppdrill panic: {}", info);

        if let Some(home) = drill_home() {
            let crash_log = home.join("crash.log");
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(2);
    }));
}

fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn open_store() -> Result<StoreHandle<FileBackend>, Box<dyn std::error::Error>> {
    Ok(StoreHandle::new(FileBackend::new()?))
}

fn load_catalog(path: &Option<PathBuf>) -> Result<ProblemCatalog, Box<dyn std::error::Error>> {
    let path = match path {
        Some(path) => path.clone(),
        None => default_catalog_path().ok_or_else(|| {
            DrillError::config("Could not determine catalog path (no home directory)")
        })?,
    };
    Ok(ProblemCatalog::load(&path)?)
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::New {
            json,
            quiet,
            preset,
            title,
            difficulty_min,
            difficulty_max,
            concepts,
            count,
            max_attempts,
            problem_timer,
            session_timer,
            order,
            no_activate,
        } => {
            use cppdrill::cli::new::{NewCommand, NewOptions};

            let cmd = NewCommand::new(open_store()?, load_catalog(&cli.catalog)?);
            let options = NewOptions {
                json,
                quiet,
                preset,
                title,
                difficulty_min,
                difficulty_max,
                concepts: (!concepts.is_empty()).then_some(concepts),
                count,
                max_attempts,
                problem_timer,
                session_timer,
                order: order.map(Into::into),
                no_activate,
            };

            let output = cmd.run(&options);
            print_output(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }

        Commands::Sessions { json, quiet, limit } => {
            use cppdrill::cli::sessions::{SessionsCommand, SessionsOptions};

            let cmd = SessionsCommand::new(open_store()?);
            let options = SessionsOptions { json, quiet, limit };

            let output = cmd.run(&options);
            print_output(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }

        Commands::Status {
            json,
            quiet,
            session_id,
        } => {
            use cppdrill::cli::status::{StatusCommand, StatusOptions};

            let cmd = StatusCommand::new(open_store()?);
            let options = StatusOptions {
                json,
                quiet,
                session_id,
            };

            let output = cmd.run(&options);
            print_output(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }

        Commands::Answer {
            outcome,
            stdout,
            give_up,
            session_id,
            json,
            quiet,
        } => {
            use cppdrill::cli::answer::{AnswerCommand, AnswerOptions};

            let cmd = AnswerCommand::new(open_store()?, load_catalog(&cli.catalog)?);
            let options = AnswerOptions {
                json,
                quiet,
                session_id,
                error_type: outcome.map(Into::into),
                stdout,
                give_up,
            };

            let output = cmd.run(&options);
            print_output(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }

        Commands::Retry {
            session_id,
            json,
            quiet,
        } => {
            use cppdrill::cli::retry::{RetryCommand, RetryOptions};

            let cmd = RetryCommand::new(open_store()?);
            let options = RetryOptions {
                json,
                quiet,
                session_id,
            };

            let output = cmd.run(&options);
            print_output(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }

        Commands::Resume {
            session_id,
            json,
            quiet,
        } => {
            use cppdrill::cli::resume::{ResumeCommand, ResumeOptions};

            let cmd = ResumeCommand::new(open_store()?);
            let options = ResumeOptions { json, quiet };

            let output = cmd.run(&session_id, &options);
            print_output(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }

        Commands::Complete {
            session_id,
            json,
            quiet,
        } => {
            use cppdrill::cli::complete::{CompleteCommand, CompleteOptions};

            let cmd = CompleteCommand::new(open_store()?);
            let options = CompleteOptions {
                json,
                quiet,
                session_id,
            };

            let output = cmd.run(&options);
            print_output(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }

        Commands::Activate {
            session_id,
            json,
            quiet,
        } => {
            use cppdrill::cli::activate::{ActivateCommand, ActivateOptions};

            let cmd = ActivateCommand::new(open_store()?);
            let options = ActivateOptions {
                json,
                quiet,
                session_id,
            };

            let output = cmd.run(&options);
            print_output(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }

        Commands::Delete {
            session_id,
            json,
            quiet,
        } => {
            use cppdrill::cli::delete::{DeleteCommand, DeleteOptions};

            let cmd = DeleteCommand::new(open_store()?);
            let options = DeleteOptions { json, quiet };

            let output = cmd.run(&session_id, &options);
            print_output(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }

        Commands::Tick {
            session_id,
            json,
            quiet,
        } => {
            use cppdrill::cli::tick::{TickCommand, TickOptions};

            let cmd = TickCommand::new(open_store()?);
            let options = TickOptions {
                json,
                quiet,
                session_id,
            };

            let output = cmd.run(&options);
            print_output(cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
    }
}

fn print_output(formatted: String) {
    if !formatted.is_empty() {
        println!("{}", formatted);
    }
}
