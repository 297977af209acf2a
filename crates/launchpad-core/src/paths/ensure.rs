//! Directory creation and verification utilities.
//!
//! The PID directory is normally provisioned by environment setup, but the
//! supervisor validates it before every launch so that an unusable directory
//! surfaces as an environment error instead of a half-started child.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::PathError;

/// What to do when the PID directory is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryCreationStrategy {
    /// Create the directory and any missing parents.
    #[default]
    AutoCreate,
    /// Fail with [`PathError::DirectoryNotFound`].
    Disallow,
}

/// Check that `path` is a writable directory, creating it if `strategy` allows.
pub fn ensure_directory(path: &Path, strategy: DirectoryCreationStrategy) -> Result<(), PathError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(PathError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => match strategy {
            DirectoryCreationStrategy::AutoCreate => {
                fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
                debug!(path = %path.display(), "Created PID directory");
            }
            DirectoryCreationStrategy::Disallow => {
                return Err(PathError::DirectoryNotFound(path.to_path_buf()));
            }
        },
        Err(e) => return Err(PathError::access(path, &e)),
    }

    verify_writable(path)
}

/// Create and remove a scratch file inside `path`.
///
/// The scratch name starts with a dot so it is never read as a PID marker, and
/// carries our PID so concurrent launchers do not trip over each other.
pub fn verify_writable(path: &Path) -> Result<(), PathError> {
    let scratch = path.join(format!(".launchpad_write_test.{}", std::process::id()));
    let not_writable = |e: io::Error| PathError::NotWritable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&scratch)
        .and_then(|mut file| file.write_all(b"ok"))
        .map_err(not_writable)?;

    if let Err(e) = fs::remove_file(&scratch) {
        debug!(path = %scratch.display(), error = %e, "Failed to remove write test file");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn auto_create_makes_nested_directory() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("a").join("pids");

        ensure_directory(&target, DirectoryCreationStrategy::AutoCreate).unwrap();
        assert!(target.is_dir());
        // Scratch file must not linger
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn disallow_reports_missing_directory() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("missing");

        let err = ensure_directory(&target, DirectoryCreationStrategy::Disallow).unwrap_err();
        assert!(matches!(err, PathError::DirectoryNotFound(p) if p == target));
    }

    #[test]
    fn regular_file_is_rejected() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("pids");
        fs::write(&target, b"not a dir").unwrap();

        let err = ensure_directory(&target, DirectoryCreationStrategy::AutoCreate).unwrap_err();
        assert!(matches!(err, PathError::NotADirectory(_)));
    }
}
