//! Serve command handler.
//!
//! Launches the app server as the single instance on this host, waits for it
//! to become ready, then stays in the foreground until Ctrl+C or until the
//! server exits on its own.

use std::process::ExitStatus;

use anyhow::Result;
use tracing::{info, warn};

use launchpad_core::{AppServerLaunch, DatasetSelection};

use crate::bootstrap::CliContext;
use crate::commands::ServeArgs;
use crate::error::CliError;

enum Outcome {
    Interrupted(std::io::Result<()>),
    Exited(std::io::Result<ExitStatus>),
}

/// Resolve the launch described by `args`.
pub fn resolve_launch(args: &ServeArgs) -> Result<AppServerLaunch, CliError> {
    let mut datasets = DatasetSelection::new(&args.primary);
    if let Some(reference) = &args.reference {
        datasets = datasets.with_reference(reference);
    }
    if let Some(corpus) = &args.corpus {
        datasets = datasets.with_corpus(corpus);
    }

    let mut launch = AppServerLaunch::from_env(&args.export_path, args.port, datasets)?
        .with_entry_point(&args.entry_point);
    if let Some(python) = &args.python {
        launch.interpreter.clone_from(python);
    }
    if let Some(dir) = &args.server_dir {
        launch.server_dir.clone_from(dir);
    }
    Ok(launch)
}

/// Execute the serve command.
pub async fn execute(ctx: &CliContext, args: &ServeArgs) -> Result<()> {
    let launch = resolve_launch(args)?;
    let supervisor = ctx.supervisor();

    let mut process = supervisor
        .start(launch.command())
        .await
        .map_err(CliError::from)?;
    let pid = process.pid();

    println!("Server is ready on http://localhost:{} (PID {pid})", launch.port);
    println!("Press Ctrl+C to stop");

    let outcome = tokio::select! {
        signal = tokio::signal::ctrl_c() => Outcome::Interrupted(signal),
        status = process.wait() => Outcome::Exited(status),
    };

    match outcome {
        Outcome::Interrupted(signal) => {
            if let Err(e) = signal {
                warn!(error = %e, "Failed to listen for Ctrl+C, stopping server");
            }
            info!(pid, "Shutting down server");
            let status = supervisor.shutdown(process).await.map_err(CliError::from)?;
            println!("Server stopped ({status})");
            Ok(())
        }
        Outcome::Exited(status) => {
            supervisor.registry().remove(pid).map_err(CliError::from)?;
            let status = status.map_err(CliError::from)?;
            Err(CliError::Process(format!("server exited unexpectedly ({status})")).into())
        }
    }
}
