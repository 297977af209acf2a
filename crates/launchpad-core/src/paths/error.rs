//! Errors from resolving launcher paths and touching the PID directory.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    /// Neither `LAUNCHPAD_DATA_DIR` nor a platform data directory is available.
    #[error("Cannot determine a data directory; set LAUNCHPAD_DATA_DIR")]
    NoDataDir,

    #[error("PID directory {0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// Missing, and the creation strategy is `Disallow`.
    #[error("PID directory {0} does not exist")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to create PID directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    #[error("PID directory {path} is not writable: {reason}")]
    NotWritable { path: PathBuf, reason: String },

    /// Reading, writing or removing a marker failed.
    #[error("Failed to access {path}: {reason}")]
    Access { path: PathBuf, reason: String },

    #[error("Cannot determine current directory: {0}")]
    CurrentDir(#[source] io::Error),
}

impl PathError {
    /// Wrap an I/O error raised while touching `path`.
    pub fn access(path: impl Into<PathBuf>, err: &io::Error) -> Self {
        Self::Access {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}
