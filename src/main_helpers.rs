use anyhow::{Context, Result};
use hcdriver_config::{ConfigBuilder, ConfigManager, DebugConfig, split_override};

use crate::cli::Cli;

/// Loads configuration for the invocation: `--config` if given, otherwise
/// discovery from the workspace, then environment and `--set` overrides.
pub(crate) fn load_config(args: &Cli) -> Result<ConfigManager> {
    let overrides = args
        .overrides
        .iter()
        .map(|raw| split_override(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = ConfigBuilder::new().cli_overrides(&overrides);
    if let Some(workspace) = &args.workspace {
        builder = builder.workspace(workspace.clone());
    }
    if let Some(config) = &args.config {
        builder = builder.config_file(config.clone());
    }

    builder.build().context("Failed to load configuration")
}

/// Installs a stderr subscriber. `RUST_LOG` wins; otherwise the `[debug]`
/// section decides. Returns whether a subscriber was installed.
pub(crate) fn initialize_tracing(debug_cfg: &DebugConfig) -> Result<bool> {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else if let Some(directives) = debug_cfg.filter_directives() {
        tracing_subscriber::EnvFilter::try_new(&directives)
            .with_context(|| format!("Invalid trace filter: {directives}"))?
    } else {
        return Ok(false);
    };

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(err) = init_result {
        tracing::warn!(error = %err, "tracing already initialized; skipping setup");
        return Ok(false);
    }
    Ok(true)
}
