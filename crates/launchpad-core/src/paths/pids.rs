//! PID marker directory and launch lock locations.

use std::path::PathBuf;

use super::PathError;
use super::platform::data_root;

/// Returns the directory where PID markers are stored.
///
/// Location: `<data_root>/pids/`
///
/// Every supervised launch leaves an empty file named after the child's PID
/// here, which lets a later, unrelated launcher find and preempt it.
pub fn pids_dir() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("pids"))
}

/// Returns the advisory lock file serialising launches on this host.
///
/// Lives next to (not inside) the PID directory so it is never listed as a
/// marker.
pub fn launch_lock_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join("launch.lock"))
}
