//! Supervisor configuration.
//!
//! Everything the registry and supervisor need is passed in explicitly
//! through [`SupervisorConfig`]; nothing is read from process-wide state after
//! construction.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::paths::{DirectoryCreationStrategy, PathError, launch_lock_path, pids_dir};

/// Line fragment printed by the child's HTTP server once it is listening.
pub const DEFAULT_READINESS_MARKER: &str = "Uvicorn running on";

/// Default bound on waiting for the readiness line.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bound on waiting for another launcher to release the lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// Default grace period between SIGTERM and SIGKILL in a synchronous shutdown.
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_secs(5);

/// Overrides `startup_timeout` (whole seconds).
pub const STARTUP_TIMEOUT_ENV: &str = "LAUNCHPAD_STARTUP_TIMEOUT_SECS";

/// Overrides `readiness_marker`.
pub const READINESS_MARKER_ENV: &str = "LAUNCHPAD_READINESS_MARKER";

/// Configuration shared by the PID registry and the process supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Directory holding one empty marker file per launched instance.
    pub pids_dir: PathBuf,
    /// Advisory lock file taken around check-kill-spawn.
    pub lock_path: PathBuf,
    /// Substring of a child output line that signals readiness.
    pub readiness_marker: String,
    /// Upper bound on waiting for readiness.
    pub startup_timeout: Duration,
    /// Upper bound on waiting for the launch lock.
    pub lock_timeout: Duration,
    /// Grace period used by synchronous shutdown before escalating to SIGKILL.
    pub stop_grace: Duration,
    /// What to do when the PID directory is missing.
    pub directory_strategy: DirectoryCreationStrategy,
}

impl SupervisorConfig {
    /// Create a configuration rooted at an explicit PID directory.
    ///
    /// The lock file is placed beside the directory as `<pids_dir>.lock`.
    pub fn new(pids_dir: impl Into<PathBuf>) -> Self {
        let pids_dir = pids_dir.into();
        let lock_path = pids_dir.with_extension("lock");
        Self {
            pids_dir,
            lock_path,
            readiness_marker: DEFAULT_READINESS_MARKER.to_string(),
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            stop_grace: DEFAULT_STOP_GRACE,
            directory_strategy: DirectoryCreationStrategy::default(),
        }
    }

    /// Resolve defaults from the data root and apply environment overrides.
    ///
    /// Malformed overrides are ignored with a warning.
    pub fn from_env() -> Result<Self, PathError> {
        let mut config = Self::new(pids_dir()?).with_lock_path(launch_lock_path()?);

        if let Ok(raw) = env::var(STARTUP_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.startup_timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "Ignoring invalid {}", STARTUP_TIMEOUT_ENV),
            }
        }

        if let Ok(marker) = env::var(READINESS_MARKER_ENV) {
            if marker.is_empty() {
                warn!("Ignoring empty {}", READINESS_MARKER_ENV);
            } else {
                config.readiness_marker = marker;
            }
        }

        Ok(config)
    }

    /// Set the lock file path.
    #[must_use]
    pub fn with_lock_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_path = path.into();
        self
    }

    /// Set the readiness substring.
    #[must_use]
    pub fn with_readiness_marker(mut self, marker: impl Into<String>) -> Self {
        self.readiness_marker = marker.into();
        self
    }

    /// Set the readiness bound.
    #[must_use]
    pub const fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    /// Set the lock acquisition bound.
    #[must_use]
    pub const fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Set the SIGTERM grace period for synchronous shutdown.
    #[must_use]
    pub const fn with_stop_grace(mut self, grace: Duration) -> Self {
        self.stop_grace = grace;
        self
    }

    /// Set how a missing PID directory is handled.
    #[must_use]
    pub const fn with_directory_strategy(mut self, strategy: DirectoryCreationStrategy) -> Self {
        self.directory_strategy = strategy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::DATA_DIR_ENV;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};

    #[test]
    fn new_places_lock_beside_pids_dir() {
        let config = SupervisorConfig::new("/var/lib/launchpad/pids");
        assert_eq!(config.lock_path, PathBuf::from("/var/lib/launchpad/pids.lock"));
        assert_eq!(config.startup_timeout, DEFAULT_STARTUP_TIMEOUT);
        assert_eq!(config.readiness_marker, DEFAULT_READINESS_MARKER);
    }

    #[test]
    fn from_env_applies_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _root = EnvVarGuard::set(DATA_DIR_ENV, "/opt/lp");
        let _timeout = EnvVarGuard::set(STARTUP_TIMEOUT_ENV, "7");
        let _marker = EnvVarGuard::set(READINESS_MARKER_ENV, "Listening on");

        let config = SupervisorConfig::from_env().unwrap();
        assert_eq!(config.pids_dir, PathBuf::from("/opt/lp/pids"));
        assert_eq!(config.lock_path, PathBuf::from("/opt/lp/launch.lock"));
        assert_eq!(config.startup_timeout, Duration::from_secs(7));
        assert_eq!(config.readiness_marker, "Listening on");
    }

    #[test]
    fn from_env_ignores_malformed_timeout() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _root = EnvVarGuard::set(DATA_DIR_ENV, "/opt/lp");
        let _timeout = EnvVarGuard::set(STARTUP_TIMEOUT_ENV, "soon");
        let _marker = EnvVarGuard::unset(READINESS_MARKER_ENV);

        let config = SupervisorConfig::from_env().unwrap();
        assert_eq!(config.startup_timeout, DEFAULT_STARTUP_TIMEOUT);
        assert_eq!(config.readiness_marker, DEFAULT_READINESS_MARKER);
    }

    #[test]
    fn config_serializes_durations() {
        let config = SupervisorConfig::new("/tmp/pids").with_startup_timeout(Duration::from_millis(50));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["directory_strategy"], "auto_create");
        let back: SupervisorConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
