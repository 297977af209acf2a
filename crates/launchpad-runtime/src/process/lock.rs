//! Advisory launch lock.
//!
//! Two launchers racing through check-kill-spawn could each see an empty
//! registry and both spawn. Holding an exclusive `flock` on a shared lock file
//! for that window serialises them. The lock is advisory and released when
//! the guard drops or the holder dies.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

use launchpad_core::SupervisorError;
use tokio::time::{Instant, sleep};
use tracing::debug;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::fcntl::{Flock, FlockArg};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Guard holding the exclusive launch lock.
#[derive(Debug)]
pub struct LaunchLock {
    path: PathBuf,
    #[cfg(unix)]
    _lock: Flock<File>,
    #[cfg(not(unix))]
    _file: File,
}

impl LaunchLock {
    /// Acquire the lock at `path`, polling until `timeout` elapses.
    pub async fn acquire(path: &Path, timeout: Duration) -> Result<Self, SupervisorError> {
        let lock_error = |reason: String| SupervisorError::Lock {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| lock_error(e.to_string()))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|e| lock_error(e.to_string()))?;

        let deadline = Instant::now() + timeout;
        let mut contended = false;

        loop {
            match Self::try_lock(file) {
                Ok(guard) => {
                    debug!(path = %path.display(), contended, "Acquired launch lock");
                    return Ok(Self {
                        path: path.to_path_buf(),
                        #[cfg(unix)]
                        _lock: guard,
                        #[cfg(not(unix))]
                        _file: guard,
                    });
                }
                Err(TryLock::Busy(returned)) => file = returned,
                Err(TryLock::Failed(reason)) => return Err(lock_error(reason)),
            }

            if !contended {
                debug!(path = %path.display(), "Launch lock held by another launcher, waiting");
                contended = true;
            }
            if Instant::now() >= deadline {
                return Err(SupervisorError::LockTimeout {
                    path: path.to_path_buf(),
                    timeout,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(unix)]
    fn try_lock(file: File) -> Result<Flock<File>, TryLock> {
        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(guard) => Ok(guard),
            Err((file, errno)) if errno == Errno::EWOULDBLOCK => Err(TryLock::Busy(file)),
            Err((_, errno)) => Err(TryLock::Failed(errno.desc().to_string())),
        }
    }

    #[cfg(not(unix))]
    fn try_lock(file: File) -> Result<File, TryLock> {
        // No flock available; launches are not serialised on this platform
        Ok(file)
    }
}

#[cfg_attr(not(unix), allow(dead_code))]
enum TryLock {
    Busy(File),
    Failed(String),
}
