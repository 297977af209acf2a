//! Filesystem-backed registry of supervised instances.
//!
//! One empty file per launched child, named by its PID, lets a later and
//! unrelated launcher on the same host find and preempt earlier instances.
//!
//! # Guarantees
//! - Markers are written right after spawn, before readiness is known
//! - Markers may be stale; `kill_all` tolerates vanished processes
//! - Files that are not decimal PIDs are never touched

mod io;
mod sweep;
mod verify;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use launchpad_core::{DirectoryCreationStrategy, PathError, ensure_directory};

pub use io::{InvalidMarker, PidMarker, delete_marker, list_markers, write_marker};
pub use sweep::{SweepReport, kill_all};
pub use verify::{pid_exists, pid_running};

/// Registry of PID markers rooted at one directory.
#[derive(Debug, Clone)]
pub struct PidRegistry {
    dir: PathBuf,
}

impl PidRegistry {
    /// Create a registry over `dir`. Nothing is touched on disk.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the markers.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate that the directory is usable, creating it if `strategy` allows.
    pub fn ensure(&self, strategy: DirectoryCreationStrategy) -> Result<(), PathError> {
        ensure_directory(&self.dir, strategy)
    }

    /// Every marker currently on disk.
    pub fn list(&self) -> Result<BTreeSet<PidMarker>, PathError> {
        list_markers(&self.dir)
    }

    /// Record a launched instance.
    pub fn add(&self, pid: u32) -> Result<PathBuf, PathError> {
        write_marker(&self.dir, pid)
    }

    /// Forget one instance.
    pub fn remove(&self, pid: u32) -> Result<(), PathError> {
        delete_marker(&self.dir, pid)
    }

    /// Force-kill every recorded instance and clear all markers.
    pub fn kill_all(&self) -> Result<SweepReport, PathError> {
        kill_all(&self.dir)
    }
}
