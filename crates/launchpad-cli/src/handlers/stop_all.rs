//! Stop-all command handler.

use anyhow::Result;
use tracing::warn;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Kill every recorded instance and clear the PID directory.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let report = ctx.supervisor().stop_all().await.map_err(CliError::from)?;

    if report.removed() == 0 {
        println!("No running instances");
        return Ok(());
    }

    println!(
        "Stopped {} instance(s), cleared {} stale marker(s)",
        report.killed, report.stale
    );
    if report.failed > 0 {
        warn!(failed = report.failed, "Some instances could not be signalled");
    }
    Ok(())
}
