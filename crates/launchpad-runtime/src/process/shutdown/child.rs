//! Graceful shutdown of an owned child with SIGTERM → SIGKILL escalation.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tokio::time::timeout;
use tracing::debug;

use super::pid::{KillOutcome, force_kill, terminate};

/// Shut down a child, escalating to SIGKILL if it outlives `grace`.
///
/// # Strategy
/// 1. Send SIGTERM to the child's process group and wait up to `grace`
/// 2. If still running, SIGKILL the group and the child itself
/// 3. Wait for reaping (required to avoid zombies)
///
/// # Returns
/// - `Ok(ExitStatus)` once the process has been reaped
/// - `Err` if signalling or waiting fails
pub async fn shutdown_child(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    if let Some(status) = child.try_wait()? {
        return Ok(status);
    }

    let pid = child
        .id()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "child has no PID"))?;

    // Phase 1: SIGTERM with grace period
    match terminate(pid) {
        Ok(KillOutcome::AlreadyGone) => return child.wait().await,
        Ok(KillOutcome::Signalled) => {}
        Err(e) if e.kind() == io::ErrorKind::Unsupported => {}
        Err(e) => return Err(e),
    }

    if let Ok(result) = timeout(grace, child.wait()).await {
        return result;
    }

    // Phase 2: SIGKILL the group, then the child handle itself
    debug!(pid, ?grace, "Process ignored SIGTERM, escalating to SIGKILL");
    let _ = force_kill(pid);
    if let Err(e) = child.start_kill() {
        // InvalidInput means it exited between the two calls
        if e.kind() != io::ErrorKind::InvalidInput {
            return Err(e);
        }
    }

    // Phase 3: Reap
    child.wait().await
}
