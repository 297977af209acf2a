//! Paths command handler.
//!
//! Displays all resolved paths for diagnostics.

use anyhow::Result;

use launchpad_core::ResolvedPaths;

use crate::error::CliError;

/// Print resolved paths in `key = value` format.
pub fn execute() -> Result<()> {
    let paths = ResolvedPaths::resolve().map_err(CliError::from)?;
    println!("{paths}");
    Ok(())
}
