//! PID marker file I/O.
//!
//! A marker is an empty file whose name is the decimal PID of a supervised
//! child. Contents are never read.

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use launchpad_core::PathError;
use tracing::debug;

/// A PID recorded in the registry directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PidMarker(u32);

impl PidMarker {
    pub const fn new(pid: u32) -> Self {
        Self(pid)
    }

    pub const fn pid(self) -> u32 {
        self.0
    }

    /// File name of this marker inside the registry directory.
    pub fn file_name(self) -> String {
        self.0.to_string()
    }
}

impl From<u32> for PidMarker {
    fn from(pid: u32) -> Self {
        Self(pid)
    }
}

impl std::fmt::Display for PidMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error for file names that are not canonical, non-zero decimal PIDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMarker;

impl FromStr for PidMarker {
    type Err = InvalidMarker;

    /// Only canonical spellings are accepted (`"42"`, not `"042"` or `"+42"`),
    /// so the marker that gets deleted is always the file that was listed.
    /// PID 0 is rejected: signalling it targets the caller's own group.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidMarker);
        }
        let pid = s.parse::<u32>().map_err(|_| InvalidMarker)?;
        if pid == 0 || pid.to_string() != s {
            return Err(InvalidMarker);
        }
        Ok(Self(pid))
    }
}

/// Create an empty marker for `pid`. Overwrites a stale marker of the same name.
pub fn write_marker(dir: &Path, pid: u32) -> Result<PathBuf, PathError> {
    let path = dir.join(PidMarker(pid).file_name());
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
        .map_err(|e| PathError::access(&path, &e))?;
    Ok(path)
}

/// Delete a marker (idempotent - no error if missing).
pub fn delete_marker(dir: &Path, pid: u32) -> Result<(), PathError> {
    let path = dir.join(PidMarker(pid).file_name());
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(PathError::access(&path, &e)),
    }
}

/// List all markers in `dir`.
///
/// A missing directory yields an empty set. Entries whose names are not
/// PIDs are skipped.
pub fn list_markers(dir: &Path) -> Result<BTreeSet<PidMarker>, PathError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(PathError::access(dir, &e)),
    };

    let mut markers = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| PathError::access(dir, &e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        match name.parse::<PidMarker>() {
            Ok(marker) => {
                markers.insert(marker);
            }
            Err(InvalidMarker) => debug!(file = %name, "Skipping non-marker file in PID directory"),
        }
    }

    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn marker_parsing_is_canonical() {
        assert_eq!("1234".parse::<PidMarker>(), Ok(PidMarker::new(1234)));
        assert_eq!("0".parse::<PidMarker>(), Err(InvalidMarker));
        assert_eq!("0042".parse::<PidMarker>(), Err(InvalidMarker));
        assert_eq!("+42".parse::<PidMarker>(), Err(InvalidMarker));
        assert_eq!("42.pid".parse::<PidMarker>(), Err(InvalidMarker));
        assert_eq!("99999999999".parse::<PidMarker>(), Err(InvalidMarker));
        assert_eq!("".parse::<PidMarker>(), Err(InvalidMarker));
    }

    #[test]
    fn write_creates_empty_file_named_by_pid() {
        let dir = tempdir().unwrap();
        let path = write_marker(dir.path(), 4321).expect("write failed");

        assert_eq!(path, dir.path().join("4321"));
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempdir().unwrap();
        write_marker(dir.path(), 77).unwrap();

        delete_marker(dir.path(), 77).expect("delete failed");
        assert!(!dir.path().join("77").exists());

        delete_marker(dir.path(), 77).expect("second delete failed");
    }

    #[test]
    fn list_skips_foreign_files() {
        let dir = tempdir().unwrap();
        write_marker(dir.path(), 10).unwrap();
        write_marker(dir.path(), 200).unwrap();
        fs::write(dir.path().join("notes.txt"), "garbage").unwrap();
        fs::write(dir.path().join(".launchpad_write_test"), "").unwrap();

        let markers = list_markers(dir.path()).expect("list failed");
        let pids: Vec<u32> = markers.iter().map(|m| m.pid()).collect();
        assert_eq!(pids, [10, 200]);
    }

    #[test]
    fn list_of_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let markers = list_markers(&dir.path().join("absent")).expect("list failed");
        assert!(markers.is_empty());
    }
}
