//! Resolved launcher paths, captured in one call.
//!
//! Backs the `launchpad paths` command and keeps the registry directory and
//! lock file derived from the same data root.

use std::path::PathBuf;

use super::{PathError, data_root, launch_lock_path, pids_dir};

/// All launcher paths resolved against the current environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Root directory for launcher state
    pub data_root: PathBuf,
    /// Directory holding PID markers
    pub pids_dir: PathBuf,
    /// Advisory lock serialising launches
    pub launch_lock: PathBuf,
}

impl ResolvedPaths {
    /// Resolve all paths using the current environment.
    pub fn resolve() -> Result<Self, PathError> {
        Ok(Self {
            data_root: data_root()?,
            pids_dir: pids_dir()?,
            launch_lock: launch_lock_path()?,
        })
    }
}

impl std::fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "data_root = {}", self.data_root.display())?;
        writeln!(f, "pids_dir = {}", self.pids_dir.display())?;
        write!(f, "launch_lock = {}", self.launch_lock.display())
    }
}
