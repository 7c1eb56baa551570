// doxsearch-cli: CLI frontend for doxsearch
// Argument parsing, logging setup, text/JSON output

mod cli;
mod output;

use clap::Parser;
use cli::Cli;
use doxsearch_core::{CommandEffect, Config, execute_command};
use output::OutputHandler;
use std::io;
use std::process::ExitCode;

/// Resolve config from --config / env / local file, then apply CLI overrides.
fn resolve_config(cli: &Cli) -> doxsearch_core::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.dir {
        config.search_dir = dir.clone();
    }
    if cli.lenient {
        config.strict = false;
    }
    Ok(config)
}

fn run(cli: &Cli) -> io::Result<CommandEffect> {
    let command = cli.to_command()?;
    let config = resolve_config(cli).map_err(io::Error::other)?;
    log::debug!("search directory: {}", config.search_dir.display());

    let output = OutputHandler::new(cli.json, cli.verbose > 0);
    execute_command(&config, &command, &output).map_err(io::Error::other)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    match run(&cli) {
        Ok(CommandEffect::None) => ExitCode::SUCCESS,
        Ok(CommandEffect::CheckFailed { failures }) => {
            eprintln!("{} malformed shard(s)", failures);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
