//! Core types for the single-instance launcher.
//!
//! This crate holds what both the runtime and the CLI agree on: where state
//! lives on disk, how a launch is configured and described, and the error
//! taxonomy. It spawns no processes and sends no signals.

pub mod config;
pub mod error;
pub mod launch;
pub mod paths;
pub mod ports;

pub use config::{
    DEFAULT_LOCK_TIMEOUT, DEFAULT_READINESS_MARKER, DEFAULT_STARTUP_TIMEOUT, DEFAULT_STOP_GRACE,
    SupervisorConfig,
};
pub use error::SupervisorError;
pub use launch::{AppServerLaunch, CommandSpec, DatasetSelection};
pub use paths::{
    DirectoryCreationStrategy, PathError, ResolvedPaths, data_root, ensure_directory,
    launch_lock_path, pids_dir,
};
pub use ports::{NoopSink, OutputLine, OutputSink, OutputStream};
