//! hcdriver - typed option handling for the hashcat engine
//!
//! Thin binary entry point that delegates to the handlers in `cli`.

use anyhow::Result;
use clap::Parser;
use hcdriver_config::DebugConfig;

mod cli;
mod main_helpers;

use cli::{Cli, Commands};
use main_helpers::{initialize_tracing, load_config};

fn main() -> Result<()> {
    let args = Cli::parse();

    // `parse` and `schema` work without any configuration on disk.
    match &args.command {
        Commands::Parse { line, json } => {
            initialize_tracing(&DebugConfig::default()).ok();
            return cli::handle_parse_command(line, *json);
        }
        Commands::Schema { json } => return cli::handle_schema_command(*json),
        Commands::Args { .. } | Commands::Check | Commands::DryRun { .. } => {}
    }

    let manager = load_config(&args)?;
    initialize_tracing(&manager.config().debug).ok();
    tracing::debug!(config = ?manager.config_path(), "configuration loaded");

    let config = manager.config();
    match args.command {
        Commands::Args { json } => cli::handle_args_command(&config.job, json),
        Commands::Check => cli::handle_check_command(config),
        Commands::DryRun { json_events } => cli::handle_dry_run_command(config, json_events),
        Commands::Parse { .. } | Commands::Schema { .. } => Ok(()),
    }
}
