//! Command handlers.
//!
//! Handlers are thin: they turn CLI input into supervisor calls and format
//! the result for the terminal. Lifecycle logic lives in `launchpad-runtime`.

pub mod paths;
pub mod serve;
pub mod status;
pub mod stop_all;
