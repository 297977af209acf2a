//! CLI-specific error types and mappings.
//!
//! Maps supervisor and path errors to exit codes and user-facing messages.

use launchpad_core::{PathError, SupervisorError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Server could not be started or stopped.
    #[error("{0}")]
    Launch(String),

    /// Server binary or interpreter could not be executed.
    #[error("Cannot run server: {0}")]
    Unavailable(String),

    /// Another launcher held the lock for too long.
    #[error("{0}")]
    Busy(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration or environment error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server process misbehaved after startup.
    #[error("Process error: {0}")]
    Process(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where a category fits.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Launch(_) => 70,      // EX_SOFTWARE
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Busy(_) => 75,        // EX_TEMPFAIL
            Self::Io(_) => 74,          // EX_IOERR
            Self::Config(_) => 78,      // EX_CONFIG
            Self::Process(_) => 71,     // EX_OSERR
        }
    }
}

impl From<SupervisorError> for CliError {
    fn from(err: SupervisorError) -> Self {
        match err {
            SupervisorError::Environment(path_err) => Self::from(path_err),
            SupervisorError::Spawn { .. } => Self::Unavailable(err.to_string()),
            SupervisorError::PrematureExit { .. } | SupervisorError::StartupTimeout { .. } => {
                Self::Launch(err.to_string())
            }
            SupervisorError::LockTimeout { .. } => Self::Busy(err.to_string()),
            SupervisorError::Lock { .. } | SupervisorError::Stop { .. } => {
                Self::Io(err.to_string())
            }
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
