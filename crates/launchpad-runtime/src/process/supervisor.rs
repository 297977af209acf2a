//! Single-instance process supervisor.
//!
//! Launches one child at a time per host. Any instance recorded in the PID
//! registry is force-killed before the new child is spawned, whichever
//! launcher started it.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use launchpad_core::{
    CommandSpec, NoopSink, OutputLine, OutputSink, OutputStream, SupervisorConfig, SupervisorError,
};
use tokio::process::{Child, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::lock::LaunchLock;
use super::shutdown::{KillOutcome, force_kill, shutdown_child, terminate};
use super::stream::spawn_stream_reader;
use super::types::SupervisedProcess;
use crate::pidfile::{PidRegistry, SweepReport};

/// How long to wait for a child killed after a startup timeout to be reaped.
const REAP_TIMEOUT: Duration = Duration::from_secs(1);

/// How long to keep reading output after the child has exited.
const EXIT_DRAIN: Duration = Duration::from_millis(100);

/// Outcome of scanning child output for the readiness line.
enum Readiness {
    Ready,
    Exited(Option<i32>),
}

/// Owns the launch of exactly one child process at a time.
pub struct ProcessSupervisor {
    config: SupervisorConfig,
    registry: PidRegistry,
    sink: Arc<dyn OutputSink>,
}

impl ProcessSupervisor {
    /// Create a supervisor; child output is discarded until a sink is set.
    pub fn new(config: SupervisorConfig) -> Self {
        let registry = PidRegistry::new(&config.pids_dir);
        Self {
            config,
            registry,
            sink: Arc::new(NoopSink),
        }
    }

    /// Forward every child output line to `sink`.
    #[must_use]
    pub fn with_output_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    pub const fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub const fn registry(&self) -> &PidRegistry {
        &self.registry
    }

    /// Launch `spec` as the single instance on this host and wait for readiness.
    ///
    /// # Steps
    /// 1. Validate the PID directory and take the launch lock
    /// 2. Force-kill every recorded instance and clear its marker
    /// 3. Spawn the child in its own process group and record its marker
    /// 4. Release the lock and scan merged stdout/stderr for the readiness line
    ///
    /// # Errors
    /// - `Environment` if the PID directory or a marker cannot be used
    /// - `Spawn` if the process cannot be created (no marker is left)
    /// - `PrematureExit` if the child exits before readiness
    /// - `StartupTimeout` if readiness is not seen within `startup_timeout`;
    ///   the child is killed and its marker left for the next sweep
    pub async fn start(&self, spec: CommandSpec) -> Result<SupervisedProcess, SupervisorError> {
        self.registry.ensure(self.config.directory_strategy)?;
        let lock = LaunchLock::acquire(&self.config.lock_path, self.config.lock_timeout).await?;

        self.preempt_existing()?;

        let started_at = Instant::now();
        let mut child = spawn_child(&spec)?;
        let pid = child.id().ok_or_else(|| SupervisorError::Spawn {
            program: spec.program.clone(),
            source: io::Error::other("child exited before its PID could be read"),
        })?;

        if let Err(e) = self.registry.add(pid) {
            // An unrecorded child could never be preempted later
            discard_child(&mut child, pid).await;
            return Err(e.into());
        }
        drop(lock);

        info!(pid, command = %spec, "Spawned child, waiting for readiness");

        let lines = self.spawn_readers(&mut child, pid);
        let marker = self.config.readiness_marker.as_str();

        let readiness = timeout(
            self.config.startup_timeout,
            wait_for_readiness(&mut child, lines, marker),
        )
        .await;

        match readiness {
            Ok(Readiness::Ready) => {
                info!(pid, elapsed = ?started_at.elapsed(), "Child is ready");
                Ok(SupervisedProcess::new(pid, child, spec, started_at))
            }
            Ok(Readiness::Exited(code)) => {
                warn!(pid, ?code, "Child exited before becoming ready");
                Err(SupervisorError::PrematureExit { pid, code })
            }
            Err(_) => {
                warn!(
                    pid,
                    timeout = ?self.config.startup_timeout,
                    "Child did not become ready in time, killing it"
                );
                discard_child(&mut child, pid).await;
                Err(SupervisorError::StartupTimeout {
                    pid,
                    timeout: self.config.startup_timeout,
                })
            }
        }
    }

    /// Non-blocking liveness check; see [`SupervisedProcess::is_alive`].
    pub fn is_alive(&self, process: &mut SupervisedProcess) -> bool {
        let alive = process.is_alive();
        if !alive {
            debug!(pid = process.pid(), "Supervised process is no longer running");
        }
        alive
    }

    /// Send SIGTERM to the child's process group and forget its marker.
    ///
    /// Does not wait for the child to exit; poll [`SupervisedProcess::is_alive`]
    /// or use [`shutdown`](Self::shutdown) for a synchronous stop.
    pub fn stop(&self, process: SupervisedProcess) -> Result<(), SupervisorError> {
        let pid = process.pid();
        match terminate(pid) {
            Ok(KillOutcome::Signalled) => debug!(pid, "Sent SIGTERM"),
            Ok(KillOutcome::AlreadyGone) => debug!(pid, "Process already gone"),
            Err(e) => warn!(pid, error = %e, "Failed to signal process"),
        }
        self.registry.remove(pid)?;
        info!(pid, "Stopped child");
        Ok(())
    }

    /// Stop the child and wait for it, escalating to SIGKILL after `stop_grace`.
    pub async fn shutdown(
        &self,
        mut process: SupervisedProcess,
    ) -> Result<ExitStatus, SupervisorError> {
        let pid = process.pid();
        let status = shutdown_child(&mut process.child, self.config.stop_grace)
            .await
            .map_err(|source| SupervisorError::Stop { pid, source })?;
        self.registry.remove(pid)?;
        info!(pid, ?status, "Child shut down");
        Ok(status)
    }

    /// Kill every recorded instance under the launch lock.
    pub async fn stop_all(&self) -> Result<SweepReport, SupervisorError> {
        let _lock = LaunchLock::acquire(&self.config.lock_path, self.config.lock_timeout).await?;
        Ok(self.registry.kill_all()?)
    }

    fn preempt_existing(&self) -> Result<(), SupervisorError> {
        let existing = self.registry.list()?;
        if existing.is_empty() {
            return Ok(());
        }

        // Only one instance may run per host; newer launches win
        warn!(
            count = existing.len(),
            pids = ?existing.iter().map(|m| m.pid()).collect::<Vec<_>>(),
            "Existing running instance detected! Shutting it down and starting a new instance"
        );
        self.registry.kill_all()?;
        Ok(())
    }

    fn spawn_readers(&self, child: &mut Child, pid: u32) -> UnboundedReceiver<OutputLine> {
        let (tx, rx) = mpsc::unbounded_channel();

        if let Some(stdout) = child.stdout.take() {
            spawn_stream_reader(stdout, pid, OutputStream::Stdout, tx.clone(), self.sink.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_stream_reader(stderr, pid, OutputStream::Stderr, tx, self.sink.clone());
        }

        rx
    }
}

/// Spawn the child with piped output, inheriting the environment.
///
/// On Unix the child leads a new process group so the whole tree can be
/// signalled through its PID.
fn spawn_child(spec: &CommandSpec) -> Result<Child, SupervisorError> {
    let mut cmd = std::process::Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(dir) = &spec.working_dir {
        cmd.current_dir(dir);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    Command::from(cmd)
        .spawn()
        .map_err(|source| SupervisorError::Spawn {
            program: spec.program.clone(),
            source,
        })
}

/// Read merged output until a line contains `marker` or the child exits.
///
/// Exit is observed through `wait`, not pipe EOF, so a background grandchild
/// holding the pipes open cannot turn an early exit into a timeout.
async fn wait_for_readiness(
    child: &mut Child,
    mut lines: UnboundedReceiver<OutputLine>,
    marker: &str,
) -> Readiness {
    let mut open = true;

    let status = loop {
        tokio::select! {
            biased;
            line = lines.recv(), if open => match line {
                Some(line) if line.text.contains(marker) => return Readiness::Ready,
                Some(_) => {}
                None => open = false,
            },
            status = child.wait() => break status,
        }
    };

    // Lines written just before exit may still be in flight from the readers
    let drained = timeout(EXIT_DRAIN, async {
        while let Some(line) = lines.recv().await {
            if line.text.contains(marker) {
                return true;
            }
        }
        false
    })
    .await;
    if matches!(drained, Ok(true)) {
        return Readiness::Ready;
    }

    match status {
        Ok(status) => Readiness::Exited(status.code()),
        Err(e) => {
            warn!(error = %e, "Failed to collect child exit status");
            Readiness::Exited(None)
        }
    }
}

/// Kill a child that will not be handed to the caller.
async fn discard_child(child: &mut Child, pid: u32) {
    if let Err(e) = force_kill(pid) {
        warn!(pid, error = %e, "Failed to kill process group");
    }
    if let Err(e) = child.start_kill() {
        // InvalidInput means it has already been reaped
        if e.kind() != io::ErrorKind::InvalidInput {
            warn!(pid, error = %e, "Failed to kill child");
        }
    }
    match timeout(REAP_TIMEOUT, child.wait()).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => warn!(pid, error = %e, "Failed to reap child"),
        Err(_) => warn!(pid, timeout = ?REAP_TIMEOUT, "Child was not reaped in time"),
    }
}
