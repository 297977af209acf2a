//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Launch, inspect and stop the single app server instance on this host.
#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Run exactly one app server instance per host")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::parse_from(["launchpad", "stop-all", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::StopAll)));
    }

    #[test]
    fn test_no_command_is_allowed() {
        let cli = Cli::parse_from(["launchpad"]);
        assert!(cli.command.is_none());
    }
}
