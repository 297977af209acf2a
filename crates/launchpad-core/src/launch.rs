//! Launch command types.
//!
//! [`CommandSpec`] is the resolved, immutable command line handed to the
//! supervisor. [`AppServerLaunch`] expresses caller intent (export path, port,
//! datasets) and resolves into a `CommandSpec`.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::paths::{PathError, current_dir};

/// Overrides the interpreter used to run the app server.
pub const PYTHON_ENV: &str = "LAUNCHPAD_PYTHON";

/// Overrides the app server's working directory.
pub const SERVER_DIR_ENV: &str = "LAUNCHPAD_SERVER_DIR";

/// Interpreter used when `LAUNCHPAD_PYTHON` is not set.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Entry point script inside the server directory.
pub const DEFAULT_ENTRY_POINT: &str = "main.py";

/// Fully resolved command used to launch one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Executable to run.
    pub program: PathBuf,
    /// Arguments, in order. Kept as OS strings so paths pass through unchanged.
    pub args: Vec<OsString>,
    /// Working directory; inherits the launcher's when `None`.
    pub working_dir: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a command with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Program followed by arguments, for logging.
    pub fn argv(&self) -> Vec<OsString> {
        std::iter::once(self.program.clone().into_os_string())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Datasets the app server loads at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSelection {
    pub primary: String,
    pub reference: Option<String>,
    pub corpus: Option<String>,
}

impl DatasetSelection {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            reference: None,
            corpus: None,
        }
    }

    #[must_use]
    pub fn with_reference(mut self, name: impl Into<String>) -> Self {
        self.reference = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_corpus(mut self, name: impl Into<String>) -> Self {
        self.corpus = Some(name.into());
        self
    }
}

/// Intent-level parameters for launching the app server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppServerLaunch {
    /// Interpreter that runs the entry point.
    pub interpreter: PathBuf,
    /// Script passed to the interpreter.
    pub entry_point: PathBuf,
    /// Working directory of the child.
    pub server_dir: PathBuf,
    /// Where the server writes exported data.
    pub export_path: PathBuf,
    /// Port the server listens on.
    pub port: u16,
    pub datasets: DatasetSelection,
}

impl AppServerLaunch {
    /// Create a launch with explicit interpreter and server directory.
    pub fn new(
        interpreter: impl Into<PathBuf>,
        server_dir: impl Into<PathBuf>,
        export_path: impl Into<PathBuf>,
        port: u16,
        datasets: DatasetSelection,
    ) -> Self {
        Self {
            interpreter: interpreter.into(),
            entry_point: PathBuf::from(DEFAULT_ENTRY_POINT),
            server_dir: server_dir.into(),
            export_path: export_path.into(),
            port,
            datasets,
        }
    }

    /// Create a launch taking interpreter and server directory from the environment.
    ///
    /// Falls back to `python3` and the current directory.
    pub fn from_env(
        export_path: impl Into<PathBuf>,
        port: u16,
        datasets: DatasetSelection,
    ) -> Result<Self, PathError> {
        let interpreter = env::var_os(PYTHON_ENV)
            .filter(|v| !v.is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_INTERPRETER), PathBuf::from);
        let server_dir = match env::var_os(SERVER_DIR_ENV).filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        Ok(Self::new(interpreter, server_dir, export_path, port, datasets))
    }

    /// Override the entry point script.
    #[must_use]
    pub fn with_entry_point(mut self, entry_point: impl AsRef<Path>) -> Self {
        self.entry_point = entry_point.as_ref().to_path_buf();
        self
    }

    /// Resolve the command line.
    ///
    /// `<interpreter> <entry> --export_path <p> --port <n> datasets --primary <name>
    /// [--reference <name>] [--corpus <name>]`
    pub fn command(&self) -> CommandSpec {
        let mut spec = CommandSpec::new(&self.interpreter)
            .arg(&self.entry_point)
            .arg("--export_path")
            .arg(&self.export_path)
            .arg("--port")
            .arg(self.port.to_string())
            .arg("datasets")
            .arg("--primary")
            .arg(&self.datasets.primary)
            .current_dir(&self.server_dir);

        if let Some(reference) = &self.datasets.reference {
            spec = spec.args(["--reference", reference.as_str()]);
        }
        if let Some(corpus) = &self.datasets.corpus {
            spec = spec.args(["--corpus", corpus.as_str()]);
        }

        info!(command = ?spec.argv(), "Resolved app server command");
        spec
    }
}
