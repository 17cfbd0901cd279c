//! Fatal errors at the process boundary and their exit codes.

use std::process::ExitCode;

use thiserror::Error;

use super::{collectors::error::CollectorError, emitter::EmitError};
use crate::{config::ConfigError, logger::LoggerError};

/// Everything that makes a run unsuccessful.
///
/// `Collection` is the only kind raised after the payload has been written.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logger(#[from] LoggerError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    Collection(#[from] CollectorError),
}

impl RunError {
    /// Distinct exit status per failure kind.
    ///
    /// | code | meaning                         |
    /// |------|---------------------------------|
    /// | 2    | config file missing/unreadable  |
    /// | 3    | config file malformed/invalid   |
    /// | 4    | payload serialization failed    |
    /// | 5    | writing standard output failed  |
    /// | 6    | logger could not be set up      |
    /// | 7    | control command did not start   |
    /// | 8    | control command timed out       |
    /// | 9    | control command exited non-zero |
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Config(e) if e.is_read_error() => 2,
            RunError::Config(_) => 3,
            RunError::Emit(EmitError::Serialization(_)) => 4,
            RunError::Emit(EmitError::Write(_)) => 5,
            RunError::Logger(_) => 6,
            RunError::Collection(CollectorError::CommandExecution { .. }) => 7,
            RunError::Collection(CollectorError::Timeout { .. }) => 8,
            RunError::Collection(_) => 9,
        }
    }
}

impl From<&RunError> for ExitCode {
    fn from(err: &RunError) -> Self {
        ExitCode::from(err.exit_code())
    }
}
