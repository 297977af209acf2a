//! `launchpad` command-line adapter.
//!
//! Parses arguments, composes the supervisor from environment and flags, and
//! dispatches to thin handlers.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, ServeArgs};
pub use error::CliError;
pub use parser::Cli;
