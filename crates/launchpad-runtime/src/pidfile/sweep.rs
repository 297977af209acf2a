//! Singleton preemption: kill every recorded instance and clear its marker.

use std::path::Path;

use launchpad_core::PathError;
use tracing::{debug, info, warn};

use super::io::{delete_marker, list_markers};
use crate::process::shutdown::{KillOutcome, force_kill};

/// Result of a sweep over the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Markers whose process received SIGKILL.
    pub killed: usize,
    /// Markers whose process no longer existed.
    pub stale: usize,
    /// Markers whose kill attempt failed for another reason (logged).
    pub failed: usize,
    /// Markers that could not be deleted after the kill attempt (logged).
    pub undeleted: usize,
}

impl SweepReport {
    /// Number of markers removed.
    pub const fn removed(&self) -> usize {
        (self.killed + self.stale + self.failed).saturating_sub(self.undeleted)
    }
}

/// Kill every process recorded in `dir` and delete its marker.
///
/// # Strategy
/// 1. List markers
/// 2. For each PID, send SIGKILL to its process group, falling back to the PID
/// 3. "No such process" counts as stale; other failures are logged and swallowed
/// 4. Delete the marker regardless of the outcome; deletion failures are
///    logged and the sweep moves on to the next marker
///
/// The launcher's own PID and process group are never signalled.
pub fn kill_all(dir: &Path) -> Result<SweepReport, PathError> {
    let markers = list_markers(dir)?;

    if markers.is_empty() {
        debug!("No PID markers found");
        return Ok(SweepReport::default());
    }

    let mut report = SweepReport::default();

    for marker in markers {
        let pid = marker.pid();
        match force_kill(pid) {
            Ok(KillOutcome::Signalled) => {
                debug!(pid, "Killed previous instance");
                report.killed += 1;
            }
            Ok(KillOutcome::AlreadyGone) => {
                debug!(pid, "Previous instance already gone, removing stale marker");
                report.stale += 1;
            }
            Err(e) => {
                warn!(pid, error = %e, "Failed to kill previous instance, removing marker anyway");
                report.failed += 1;
            }
        }
        if let Err(e) = delete_marker(dir, pid) {
            warn!(pid, error = %e, "Failed to remove PID marker");
            report.undeleted += 1;
        }
    }

    info!(
        killed = report.killed,
        stale = report.stale,
        failed = report.failed,
        undeleted = report.undeleted,
        "PID sweep complete"
    );

    Ok(report)
}
