//! Output sink port for child process output.
//!
//! The supervisor reads the child's stdout and stderr for the readiness line
//! and then keeps draining them so the child never blocks on a full pipe.
//! Every line is handed to an `OutputSink`; the CLI forwards lines to
//! tracing, tests collect them.

use serde::{Deserialize, Serialize};

/// Which pipe a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl std::fmt::Display for OutputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded line of child output, without its trailing newline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLine {
    pub stream: OutputStream,
    pub text: String,
}

/// Destination for child output lines.
///
/// Implementations must be thread-safe and should not block.
pub trait OutputSink: Send + Sync {
    /// Append one line from the child identified by `pid`.
    fn append(&self, pid: u32, line: &OutputLine);
}

/// A sink that discards all lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl OutputSink for NoopSink {
    fn append(&self, _pid: u32, _line: &OutputLine) {}
}
