//! CLI entry point - the composition root.

use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use launchpad_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Paths => handlers::paths::execute(),
        Commands::Status { json } => {
            let ctx = bootstrap(CliConfig::from_env().map_err(CliError::from)?);
            handlers::status::execute(&ctx, json)
        }
        Commands::StopAll => {
            let ctx = bootstrap(CliConfig::from_env().map_err(CliError::from)?);
            handlers::stop_all::execute(&ctx).await
        }
        Commands::Serve(args) => {
            let config = CliConfig::from_env()
                .map_err(CliError::from)?
                .with_serve_overrides(&args);
            let ctx = bootstrap(config);
            handlers::serve::execute(&ctx, &args).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so it can feed LAUNCHPAD_* overrides
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}
