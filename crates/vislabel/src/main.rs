//! Entry point for the `vislabel` command.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use vislabel::cli::{Cli, run};
use vislabel::config::CliConfig;
use vislabel::error::CliError;
use vislabel::logging::init_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&CliConfig::default());
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::from(2);
        }
    };
    init_logging(&config);

    debug!(version = env!("CARGO_PKG_VERSION"), "starting vislabel");

    let mut stdout = io::stdout().lock();
    run(&cli.command, &config, &mut stdout).map_or_else(
        |e| {
            tracing::error!("command failed: {e:#}");
            ExitCode::from(2)
        },
        |outcome| ExitCode::from(outcome.exit_code()),
    )
}

fn build_config(cli: &Cli) -> Result<CliConfig, CliError> {
    let config = CliConfig::from_env()?;
    Ok(config.apply_overrides(cli.log_level, cli.max_depth))
}
