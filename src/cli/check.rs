use anyhow::{Context, Result};
use hcdriver_config::HcDriverConfig;
use hcdriver_events::{
    EngineEvent, EventHandler, JsonLinesHandler, TaskInformationEvent, TracingHandler,
};
use hcdriver_runner::{DryRunEngine, Session};
use tracing::info;

/// Validates `[engine]` and prints the resolved paths.
pub fn handle_check_command(config: &HcDriverConfig) -> Result<()> {
    let resolved = config
        .engine
        .validate()
        .context("Engine configuration is invalid")?;

    println!("executable: {}", resolved.executable_path.display());
    println!("shared:     {}", resolved.shared_path.display());
    Ok(())
}

/// Runs `[job]` through a session backed by [`DryRunEngine`] and prints
/// what the engine would have been asked to do.
///
/// The dry-run job reports the task it would start, either through tracing
/// or, with `json_events`, as versioned JSON lines on stdout.
pub fn handle_dry_run_command(config: &HcDriverConfig, json_events: bool) -> Result<()> {
    if json_events {
        let handler = JsonLinesHandler::new(std::io::stdout());
        dry_run(config, handler)
    } else {
        dry_run(config, TracingHandler::default())
    }
}

fn dry_run<H>(config: &HcDriverConfig, handler: H) -> Result<()>
where
    H: EventHandler + 'static,
{
    let engine = DryRunEngine::new();
    engine.script_job(vec![EngineEvent::TaskInformation(TaskInformationEvent {
        session: config.job.session_name.clone(),
        hash_type: config.job.hash_type,
        attack_mode: config.job.attack_mode,
        ..TaskInformationEvent::default()
    })]);

    let session = Session::new(&config.engine, engine.clone(), handler)
        .context("Engine configuration is invalid")?;
    info!(executable = %session.engine_paths().executable_path.display(), "dry run");

    session
        .run_job_with_options(&config.job)
        .context("Dry run failed")?;

    for invocation in engine.logged_invocations() {
        println!("{}", invocation.command_line());
    }
    Ok(())
}
