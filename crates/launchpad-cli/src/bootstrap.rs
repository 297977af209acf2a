//! CLI bootstrap - the composition root.
//!
//! Configuration comes from the environment (after `.env` is loaded), then
//! command flags are applied on top. The supervisor is built once here and
//! handed to handlers through [`CliContext`].

use std::sync::Arc;
use std::time::Duration;

use launchpad_core::{PathError, SupervisorConfig};
use launchpad_runtime::{ProcessSupervisor, TracingSink};

use crate::commands::ServeArgs;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub supervisor: SupervisorConfig,
}

impl CliConfig {
    /// Resolve paths and overrides from the environment.
    pub fn from_env() -> Result<Self, PathError> {
        Ok(Self {
            supervisor: SupervisorConfig::from_env()?,
        })
    }

    /// Apply `serve` flags that tune the supervisor.
    #[must_use]
    pub fn with_serve_overrides(mut self, args: &ServeArgs) -> Self {
        if let Some(secs) = args.startup_timeout.filter(|s| *s > 0) {
            self.supervisor = self
                .supervisor
                .with_startup_timeout(Duration::from_secs(secs));
        }
        if let Some(marker) = args.readiness_marker.as_ref().filter(|m| !m.is_empty()) {
            self.supervisor = self.supervisor.with_readiness_marker(marker.clone());
        }
        self
    }
}

/// Composed application context for CLI commands.
pub struct CliContext {
    supervisor: ProcessSupervisor,
}

impl CliContext {
    pub const fn supervisor(&self) -> &ProcessSupervisor {
        &self.supervisor
    }
}

/// Build the CLI context. Child output is forwarded to tracing.
pub fn bootstrap(config: CliConfig) -> CliContext {
    let supervisor = ProcessSupervisor::new(config.supervisor).with_output_sink(Arc::new(TracingSink));
    CliContext { supervisor }
}
