use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};
use hcdriver_config::ResolvedEngine;
use hcdriver_events::{EngineEvent, EventHandler};
use parking_lot::Mutex;

/// Describes one job handed to an [`EngineLifecycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInvocation {
    pub executable_path: PathBuf,
    pub shared_path: PathBuf,
    pub args: Vec<String>,
}

impl JobInvocation {
    pub fn new(engine: &ResolvedEngine, args: Vec<String>) -> Self {
        Self {
            executable_path: engine.executable_path.clone(),
            shared_path: engine.shared_path.clone(),
            args,
        }
    }

    /// Value of `--session=...` in the argument list, if any.
    pub fn session_name(&self) -> Option<&str> {
        self.args
            .iter()
            .rev()
            .find_map(|arg| arg.strip_prefix("--session="))
    }

    /// Space separated command line, for logs and dry runs.
    pub fn command_line(&self) -> String {
        let mut line = self.executable_path.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Boundary to the native engine.
///
/// `run_job` blocks until the job ends and must only call `handler` before
/// it returns. `stop_at_checkpoint` may be called from another thread while
/// a job runs.
pub trait EngineLifecycle: Send + Sync {
    fn run_job(&self, invocation: &JobInvocation, handler: &dyn EventHandler) -> Result<()>;

    fn stop_at_checkpoint(&self) -> Result<()>;

    /// Hash types (`--hash-type` values) the engine considers plausible for
    /// `hash`. An empty list means no candidate matched.
    fn identify_hash(&self, engine: &ResolvedEngine, hash: &str) -> Result<Vec<i64>>;
}

#[derive(Debug, Clone)]
enum ScriptedJob {
    Events(Vec<EngineEvent>),
    Failure(String),
}

#[derive(Debug, Default)]
struct DryRunState {
    invocations: Mutex<Vec<JobInvocation>>,
    script: Mutex<VecDeque<ScriptedJob>>,
    checkpoint_requests: AtomicUsize,
    identifications: Mutex<HashMap<String, Vec<i64>>>,
}

/// Engine that never launches anything.
///
/// Every invocation is recorded. Jobs replay scripted events in order; a job
/// without a script emits nothing. Only scripted hashes are identified. Clones share state, so a clone kept by the
/// caller observes what the session did with the other.
#[derive(Debug, Clone, Default)]
pub struct DryRunEngine {
    state: Arc<DryRunState>,
}

impl DryRunEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the events one upcoming job will emit.
    pub fn script_job(&self, events: Vec<EngineEvent>) -> &Self {
        self.state.script.lock().push_back(ScriptedJob::Events(events));
        self
    }

    /// Queue a job that fails with `message`.
    pub fn script_failure(&self, message: impl Into<String>) -> &Self {
        self.state
            .script
            .lock()
            .push_back(ScriptedJob::Failure(message.into()));
        self
    }

    /// Answer `identify_hash(hash)` with `hash_types`.
    pub fn script_identification(&self, hash: impl Into<String>, hash_types: Vec<i64>) -> &Self {
        self.state
            .identifications
            .lock()
            .insert(hash.into(), hash_types);
        self
    }

    pub fn logged_invocations(&self) -> Vec<JobInvocation> {
        self.state.invocations.lock().clone()
    }

    pub fn checkpoint_requests(&self) -> usize {
        self.state.checkpoint_requests.load(Ordering::SeqCst)
    }
}

impl EngineLifecycle for DryRunEngine {
    fn run_job(&self, invocation: &JobInvocation, handler: &dyn EventHandler) -> Result<()> {
        self.state.invocations.lock().push(invocation.clone());

        // Released before the handler runs so handlers may script further jobs.
        let scripted = self.state.script.lock().pop_front();
        match scripted {
            Some(ScriptedJob::Events(events)) => {
                for event in &events {
                    handler.handle(event);
                }
                Ok(())
            }
            Some(ScriptedJob::Failure(message)) => bail!(message),
            None => Ok(()),
        }
    }

    fn stop_at_checkpoint(&self) -> Result<()> {
        self.state.checkpoint_requests.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn identify_hash(&self, _engine: &ResolvedEngine, hash: &str) -> Result<Vec<i64>> {
        Ok(self
            .state
            .identifications
            .lock()
            .get(hash)
            .cloned()
            .unwrap_or_default())
    }
}
