//! Handle to a supervised child.

use std::io;
use std::process::ExitStatus;
use std::time::{Duration, Instant};

use launchpad_core::CommandSpec;
use tokio::process::Child;
use tracing::warn;

use crate::pidfile::pid_running;

/// Lifecycle state as observed through the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Exited(Option<i32>),
}

/// A live child that passed its readiness check.
///
/// Owned by the caller of [`ProcessSupervisor::start`](super::ProcessSupervisor::start)
/// and consumed by `stop` or `shutdown`. Dropping the handle does not kill
/// the child; its PID marker stays behind for the next launch to sweep.
#[derive(Debug)]
pub struct SupervisedProcess {
    pid: u32,
    pub(crate) child: Child,
    command: CommandSpec,
    started_at: Instant,
}

impl SupervisedProcess {
    pub(crate) fn new(pid: u32, child: Child, command: CommandSpec, started_at: Instant) -> Self {
        Self {
            pid,
            child,
            command,
            started_at,
        }
    }

    /// Process ID (also the process group ID).
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    /// Command this process was launched with.
    pub const fn command(&self) -> &CommandSpec {
        &self.command
    }

    /// Time since spawn.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// True iff the child has not exited and is not a zombie.
    ///
    /// Non-blocking. Reaps the child if it has exited.
    pub fn is_alive(&mut self) -> bool {
        matches!(self.state(), ProcessState::Running) && pid_running(self.pid)
    }

    /// Poll the child's state without blocking.
    pub fn state(&mut self) -> ProcessState {
        match self.child.try_wait() {
            Ok(None) => ProcessState::Running,
            Ok(Some(status)) => ProcessState::Exited(status.code()),
            Err(e) => {
                warn!(pid = self.pid, error = %e, "Failed to poll child status");
                ProcessState::Exited(None)
            }
        }
    }

    /// Wait for the child to exit on its own.
    pub async fn wait(&mut self) -> io::Result<ExitStatus> {
        self.child.wait().await
    }
}
