//! Platform-specific data root resolution.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "LAUNCHPAD_DATA_DIR";

/// Get the root directory for launcher state (PID markers, launch lock).
///
/// Resolution order:
/// 1. `LAUNCHPAD_DATA_DIR` environment variable (highest priority)
/// 2. System data directory (e.g., `~/.local/share/launchpad`)
///
/// The directory is not created here; callers validate the pieces they need
/// with [`ensure_directory`](super::ensure_directory).
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(DATA_DIR_ENV)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    Ok(data_dir.join("launchpad"))
}

/// Current working directory, mapped into [`PathError`].
pub fn current_dir() -> Result<PathBuf, PathError> {
    env::current_dir().map_err(PathError::CurrentDir)
}
