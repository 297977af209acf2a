//! Status command handler.
//!
//! Lists every PID marker with its liveness. Markers are not cleaned up
//! here; `stop-all` or the next `serve` does that.

use anyhow::Result;
use serde::Serialize;

use launchpad_core::PathError;
use launchpad_runtime::{PidMarker, PidRegistry, pid_exists, pid_running};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// One recorded instance as seen right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceStatus {
    pub pid: u32,
    /// Process table has a live, non-zombie entry.
    pub running: bool,
    /// Marker refers to a process that no longer exists.
    pub stale: bool,
}

/// Check liveness of every marker in `registry`.
pub fn collect(registry: &PidRegistry) -> Result<Vec<InstanceStatus>, PathError> {
    Ok(registry
        .list()?
        .into_iter()
        .map(PidMarker::pid)
        .map(|pid| InstanceStatus {
            pid,
            running: pid_running(pid),
            stale: !pid_exists(pid),
        })
        .collect())
}

/// Print recorded instances as a table or JSON.
pub fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    let registry = ctx.supervisor().registry();
    let instances = collect(registry).map_err(CliError::from)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&instances)?);
        return Ok(());
    }

    if instances.is_empty() {
        println!("No recorded instances in {}", registry.dir().display());
        return Ok(());
    }

    println!("{:<10} STATE", "PID");
    for instance in &instances {
        let state = match (instance.running, instance.stale) {
            (true, _) => "running",
            (false, true) => "stale",
            (false, false) => "exited",
        };
        println!("{:<10} {state}", instance.pid);
    }
    Ok(())
}
