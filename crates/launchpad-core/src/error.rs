//! Error taxonomy for supervised launches.
//!
//! Every variant aborts `start`; nothing here is retried. Failed kills of
//! recorded PIDs are logged by the registry and never returned.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::paths::PathError;

/// Errors returned by the process supervisor.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The PID directory (or a marker inside it) is unusable.
    #[error("PID registry unusable: {0}")]
    Environment(#[from] PathError),

    /// The child process could not be created.
    #[error("Failed to spawn {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The child closed its output before printing the readiness line.
    #[error("Process {pid} exited before becoming ready ({})", describe_exit(.code))]
    PrematureExit { pid: u32, code: Option<i32> },

    /// The readiness line was not seen within the configured bound.
    #[error("Process {pid} did not become ready within {timeout:?}")]
    StartupTimeout { pid: u32, timeout: Duration },

    /// Another launcher held the launch lock for too long.
    #[error("Timed out after {timeout:?} waiting for launch lock {}", .path.display())]
    LockTimeout { path: PathBuf, timeout: Duration },

    /// Signalling or reaping a supervised process failed.
    #[error("Failed to stop process {pid}: {source}")]
    Stop {
        pid: u32,
        #[source]
        source: io::Error,
    },

    /// The launch lock could not be opened or locked.
    #[error("Failed to lock {}: {reason}", .path.display())]
    Lock { path: PathBuf, reason: String },
}

#[allow(clippy::ref_option)]
fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl SupervisorError {
    /// Exit code of a child that died before readiness, if it exited normally.
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::PrematureExit { code, .. } => *code,
            _ => None,
        }
    }
}
