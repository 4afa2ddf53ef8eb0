//! Error types for the CLI

use std::path::PathBuf;
use thiserror::Error;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input file error
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Solver error
    #[error("Solver error: {0}")]
    Solver(#[from] aoc_framework::SolverError),

    /// Registration error
    #[error("Registration error: {0}")]
    Registration(#[from] aoc_framework::RegistrationError),

    /// Logger could not be installed
    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),

    /// One or more puzzles failed; each failure was already reported as it
    /// happened, so only the count is shown here
    #[error("{} puzzle run(s) failed", .0.failure_count())]
    Run(#[from] RunError),
}

/// Input file errors
#[derive(Error, Debug)]
pub enum InputError {
    /// No input file for the day
    #[error("no input for day {day:02} at {}", path.display())]
    Missing { day: u8, path: PathBuf },

    /// The file exists but could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of individual puzzles during a run
#[derive(Error, Debug)]
pub enum RunError {
    /// The day's input could not be loaded
    #[error("day {day:02}: {source}")]
    Input {
        day: u8,
        #[source]
        source: InputError,
    },

    /// The solver could not be created, usually a parse failure
    #[error("day {day:02}: {source}")]
    Setup {
        day: u8,
        #[source]
        source: aoc_framework::SolverError,
    },

    /// A single part failed
    #[error("day {day:02} part {part}: {source}")]
    Part {
        day: u8,
        part: u8,
        #[source]
        source: aoc_framework::SolverError,
    },

    /// Multiple errors collected during the run
    #[error("{} puzzle runs failed", .0.len())]
    Multiple(Vec<RunError>),
}

impl RunError {
    /// Combine two errors into one, flattening nested `Multiple`s
    pub fn combine(first: RunError, second: RunError) -> RunError {
        let errors = match (first, second) {
            (RunError::Multiple(mut v1), RunError::Multiple(v2)) => {
                v1.extend(v2);
                v1
            }
            (first, RunError::Multiple(v)) => {
                let mut combined = vec![first];
                combined.extend(v);
                combined
            }
            (RunError::Multiple(mut v), second) => {
                v.push(second);
                v
            }
            (first, second) => vec![first, second],
        };
        RunError::Multiple(errors)
    }

    /// Number of individual failures, counting through `Multiple`
    pub fn failure_count(&self) -> usize {
        match self {
            RunError::Multiple(errors) => errors.iter().map(RunError::failure_count).sum(),
            _ => 1,
        }
    }

    /// Combine an optional error with a new error
    pub fn combine_opt(existing: Option<RunError>, new: RunError) -> RunError {
        match existing {
            Some(e) => Self::combine(e, new),
            None => new,
        }
    }
}
