//! End-to-end tests for the single-instance supervisor.
//!
//! Children are real `sh` processes that print the readiness line (or not).
//! Each test gets its own PID directory and lock file so tests can run in
//! parallel.

#![cfg(unix)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use launchpad_core::{
    CommandSpec, OutputLine, OutputSink, OutputStream, SupervisorConfig, SupervisorError,
};
use launchpad_runtime::{PidMarker, ProcessSupervisor, pid_running};
use tempfile::{TempDir, tempdir};

const READY_LINE: &str = "INFO:     Uvicorn running on http://127.0.0.1:6006";

/// Higher than any platform's pid_max, so never a live process.
const IMPOSSIBLE_PID: u32 = 2_000_000_000;

#[derive(Default)]
struct CollectingSink {
    lines: Mutex<Vec<(u32, OutputLine)>>,
}

impl CollectingSink {
    fn lines(&self) -> Vec<(u32, OutputLine)> {
        self.lines.lock().unwrap().clone()
    }
}

impl OutputSink for CollectingSink {
    fn append(&self, pid: u32, line: &OutputLine) {
        self.lines.lock().unwrap().push((pid, line.clone()));
    }
}

fn config(dir: &TempDir) -> SupervisorConfig {
    SupervisorConfig::new(dir.path().join("pids"))
        .with_startup_timeout(Duration::from_secs(10))
        .with_lock_timeout(Duration::from_secs(5))
        .with_stop_grace(Duration::from_secs(2))
}

fn sh(script: &str) -> CommandSpec {
    CommandSpec::new("sh").args(["-c", script])
}

fn ready_then_sleep() -> CommandSpec {
    sh(&format!("echo '{READY_LINE}'; exec sleep 30"))
}

fn marker_pids(supervisor: &ProcessSupervisor) -> Vec<u32> {
    supervisor
        .registry()
        .list()
        .unwrap()
        .into_iter()
        .map(PidMarker::pid)
        .collect()
}

async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

#[tokio::test]
async fn test_ready_child_is_alive_and_recorded() {
    let dir = tempdir().unwrap();
    let supervisor = ProcessSupervisor::new(config(&dir));

    let mut process = supervisor.start(ready_then_sleep()).await.unwrap();

    assert!(process.is_alive());
    assert_eq!(marker_pids(&supervisor), [process.pid()]);

    supervisor.shutdown(process).await.unwrap();
}

#[tokio::test]
async fn test_premature_exit_reports_code_and_leaves_marker() {
    let dir = tempdir().unwrap();
    let supervisor = ProcessSupervisor::new(config(&dir));

    let err = supervisor
        .start(sh("echo 'loading datasets'; exit 1"))
        .await
        .unwrap_err();

    let SupervisorError::PrematureExit { pid, code } = err else {
        panic!("expected PrematureExit, got {err:?}");
    };
    assert_eq!(code, Some(1));
    assert_eq!(marker_pids(&supervisor), [pid]);
}

#[tokio::test]
async fn test_exit_with_background_grandchild_is_premature_exit() {
    let dir = tempdir().unwrap();
    let supervisor = ProcessSupervisor::new(config(&dir));

    // The backgrounded sleep keeps stdout open after sh exits
    let started = Instant::now();
    let err = supervisor.start(sh("sleep 20 & exit 1")).await.unwrap_err();

    let SupervisorError::PrematureExit { pid, code } = err else {
        panic!("expected PrematureExit, got {err:?}");
    };
    assert_eq!(code, Some(1));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(marker_pids(&supervisor), [pid]);

    // Sweeping the marker takes down the leftover process group
    let report = supervisor.stop_all().await.unwrap();
    assert_eq!(report.removed(), 1);
}

#[tokio::test]
async fn test_missing_readiness_line_times_out() {
    let dir = tempdir().unwrap();
    let supervisor = ProcessSupervisor::new(
        config(&dir).with_startup_timeout(Duration::from_millis(50)),
    );

    let started = Instant::now();
    let err = supervisor.start(sh("exec sleep 30")).await.unwrap_err();

    let SupervisorError::StartupTimeout { pid, timeout } = err else {
        panic!("expected StartupTimeout, got {err:?}");
    };
    assert_eq!(timeout, Duration::from_millis(50));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(eventually(|| !pid_running(pid)).await);
}

#[tokio::test]
async fn test_stale_marker_is_swept_on_start() {
    let dir = tempdir().unwrap();
    let supervisor = ProcessSupervisor::new(config(&dir));
    supervisor.registry().ensure(Default::default()).unwrap();
    supervisor.registry().add(IMPOSSIBLE_PID).unwrap();

    let process = supervisor.start(ready_then_sleep()).await.unwrap();

    assert_eq!(marker_pids(&supervisor), [process.pid()]);
    supervisor.shutdown(process).await.unwrap();
}

#[tokio::test]
async fn test_readiness_line_on_stderr() {
    let dir = tempdir().unwrap();
    let sink = Arc::new(CollectingSink::default());
    let supervisor = ProcessSupervisor::new(config(&dir)).with_output_sink(sink.clone());

    let process = supervisor
        .start(sh(&format!("echo booting; echo '{READY_LINE}' >&2; exec sleep 30")))
        .await
        .unwrap();

    let lines = sink.lines();
    assert!(lines.iter().all(|(pid, _)| *pid == process.pid()));
    assert!(lines.iter().any(|(_, l)| l.stream == OutputStream::Stderr && l.text == READY_LINE));

    supervisor.shutdown(process).await.unwrap();
}

#[tokio::test]
async fn test_spawn_error_leaves_no_marker() {
    let dir = tempdir().unwrap();
    let supervisor = ProcessSupervisor::new(config(&dir));

    let err = supervisor
        .start(CommandSpec::new("/nonexistent/app-server"))
        .await
        .unwrap_err();

    assert!(matches!(err, SupervisorError::Spawn { .. }), "got {err:?}");
    assert!(marker_pids(&supervisor).is_empty());
}

#[tokio::test]
async fn test_unusable_pid_directory_is_environment_error() {
    let dir = tempdir().unwrap();
    let pids = dir.path().join("pids");
    std::fs::write(&pids, b"not a directory").unwrap();
    let supervisor = ProcessSupervisor::new(SupervisorConfig::new(&pids));

    let err = supervisor.start(ready_then_sleep()).await.unwrap_err();

    assert!(matches!(err, SupervisorError::Environment(_)), "got {err:?}");
}

#[tokio::test]
async fn test_second_start_preempts_first() {
    let dir = tempdir().unwrap();
    let supervisor = ProcessSupervisor::new(config(&dir));

    let mut first = supervisor.start(ready_then_sleep()).await.unwrap();
    // A second supervisor over the same directory stands in for another launcher
    let other = ProcessSupervisor::new(config(&dir));
    let second = other.start(ready_then_sleep()).await.unwrap();

    assert!(eventually(|| !first.is_alive()).await);
    assert_eq!(marker_pids(&supervisor), [second.pid()]);

    other.shutdown(second).await.unwrap();
}

#[tokio::test]
async fn test_stop_all_on_empty_registry_is_noop() {
    let dir = tempdir().unwrap();
    let supervisor = ProcessSupervisor::new(config(&dir));

    let report = supervisor.stop_all().await.unwrap();
    assert_eq!(report.removed(), 0);
    assert_eq!(report.failed, 0);

    let again = supervisor.stop_all().await.unwrap();
    assert_eq!(again.removed(), 0);
}

#[tokio::test]
async fn test_stop_all_kills_every_instance() {
    let dir = tempdir().unwrap();
    let supervisor = ProcessSupervisor::new(config(&dir));
    let mut process = supervisor.start(ready_then_sleep()).await.unwrap();
    supervisor.registry().add(IMPOSSIBLE_PID).unwrap();

    let report = supervisor.stop_all().await.unwrap();

    assert_eq!(report.killed, 1);
    assert_eq!(report.stale, 1);
    assert!(marker_pids(&supervisor).is_empty());
    assert!(eventually(|| !process.is_alive()).await);
}

#[tokio::test]
async fn test_stop_signals_and_removes_marker() {
    let dir = tempdir().unwrap();
    let supervisor = ProcessSupervisor::new(config(&dir));
    let process = supervisor.start(ready_then_sleep()).await.unwrap();
    let pid = process.pid();

    supervisor.stop(process).unwrap();

    assert!(marker_pids(&supervisor).is_empty());
    assert!(eventually(|| !pid_running(pid)).await);
}

#[tokio::test]
async fn test_shutdown_waits_for_exit() {
    let dir = tempdir().unwrap();
    let supervisor = ProcessSupervisor::new(config(&dir));
    let process = supervisor.start(ready_then_sleep()).await.unwrap();

    let status = supervisor.shutdown(process).await.unwrap();

    assert!(!status.success());
    assert!(marker_pids(&supervisor).is_empty());
}

#[tokio::test]
async fn test_custom_readiness_marker() {
    let dir = tempdir().unwrap();
    let supervisor =
        ProcessSupervisor::new(config(&dir).with_readiness_marker("Listening on port"));

    let process = supervisor
        .start(sh("echo 'Listening on port 8080'; exec sleep 30"))
        .await
        .unwrap();

    assert_eq!(process.command().program, std::path::PathBuf::from("sh"));
    supervisor.shutdown(process).await.unwrap();
}
