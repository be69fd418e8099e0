use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod check;
mod options;

pub use check::{handle_check_command, handle_dry_run_command};
pub use options::{handle_args_command, handle_parse_command, handle_schema_command};

#[derive(Debug, Parser)]
#[command(name = "hcdriver")]
#[command(about = "Build, inspect and check hashcat job options")]
#[command(version)]
pub struct Cli {
    /// Configuration file to use instead of workspace discovery
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Workspace directory searched for hcdriver.toml (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Override a configuration value, e.g. `--set job.hash_type=0` (repeatable)
    #[arg(long = "set", global = true, value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the engine arguments for the configured `[job]`
    Args {
        /// Output a JSON array instead of one argument per line
        #[arg(long)]
        json: bool,
    },

    /// Parse a serialized command line back into job options
    Parse {
        /// Command line to parse; multiple values are joined with spaces
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        line: Vec<String>,

        /// Output JSON instead of a TOML `[job]` table
        #[arg(long)]
        json: bool,
    },

    /// List every supported engine switch
    Schema {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate the `[engine]` section and print the resolved locations
    Check,

    /// Run the configured `[job]` through a dry-run engine and print the invocation
    DryRun {
        /// Print engine events as versioned JSON lines instead of logging them
        #[arg(long)]
        json_events: bool,
    },
}
