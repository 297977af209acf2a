//! Path utilities for launcher state.
//!
//! - Data root (overridable with `LAUNCHPAD_DATA_DIR`)
//! - PID marker directory and launch lock file
//! - Directory validation used before every launch
//!
//! Returns `PathBuf` and `PathError`; no interactive I/O happens here.

mod ensure;
mod error;
mod pids;
mod platform;
mod resolver;

#[cfg(test)]
pub(crate) mod test_utils;

pub use ensure::{DirectoryCreationStrategy, ensure_directory, verify_writable};
pub use error::PathError;
pub use pids::{launch_lock_path, pids_dir};
pub use platform::{DATA_DIR_ENV, current_dir, data_root};
pub use resolver::ResolvedPaths;
