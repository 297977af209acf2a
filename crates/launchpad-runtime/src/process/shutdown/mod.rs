//! Process termination.
//!
//! - `force_kill` / `terminate`: PID-only signalling for markers and handles
//! - `shutdown_child`: bounded graceful shutdown of an owned child (includes reaping)

mod child;
mod pid;

pub use child::shutdown_child;
pub use pid::{KillOutcome, force_kill, terminate};
