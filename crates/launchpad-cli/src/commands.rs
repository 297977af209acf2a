//! Subcommand definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the app server, replacing any running instance
    Serve(ServeArgs),

    /// Kill every recorded instance and clear their PID markers
    StopAll,

    /// List recorded instances and whether they are still running
    Status {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved data, PID and lock paths
    Paths,
}

/// Arguments for `launchpad serve`.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Directory the server writes exported data to
    #[arg(long = "export-path")]
    pub export_path: PathBuf,

    /// Port the server listens on
    #[arg(short, long, default_value = "6006")]
    pub port: u16,

    /// Primary dataset name
    #[arg(long)]
    pub primary: String,

    /// Reference dataset name
    #[arg(long)]
    pub reference: Option<String>,

    /// Corpus dataset name
    #[arg(long)]
    pub corpus: Option<String>,

    /// Interpreter that runs the server (default: $LAUNCHPAD_PYTHON or python3)
    #[arg(long)]
    pub python: Option<PathBuf>,

    /// Server working directory (default: $LAUNCHPAD_SERVER_DIR or the current directory)
    #[arg(long = "server-dir")]
    pub server_dir: Option<PathBuf>,

    /// Entry point script, relative to the server directory
    #[arg(long = "entry-point", default_value = "main.py")]
    pub entry_point: PathBuf,

    /// Seconds to wait for the readiness line
    #[arg(long = "startup-timeout")]
    pub startup_timeout: Option<u64>,

    /// Output fragment that marks the server as ready
    #[arg(long = "readiness-marker")]
    pub readiness_marker: Option<String>,
}
