//! Child process supervision.
//!
//! # Structure
//!
//! - `ProcessSupervisor` - single-instance launch, readiness wait and stop
//! - `SupervisedProcess` - caller-owned handle to a ready child
//! - `LaunchLock` - advisory lock around check-kill-spawn
//! - `TracingSink` - forwards child output to `tracing`
//! - `shutdown` - signalling and bounded graceful shutdown

mod lock;
pub mod shutdown;
mod stream;
mod supervisor;
mod types;

pub use lock::LaunchLock;
pub use shutdown::{KillOutcome, force_kill, shutdown_child, terminate};
pub use stream::TracingSink;
pub use supervisor::ProcessSupervisor;
pub use types::{ProcessState, SupervisedProcess};
