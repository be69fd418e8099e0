use std::sync::atomic::{AtomicBool, Ordering};

use hcdriver_args::SessionOptions;
use hcdriver_config::{EngineConfig, ResolvedEngine};
use hcdriver_events::EventHandler;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::executor::{EngineLifecycle, JobInvocation};

/// A validated engine plus the handler that receives its events.
///
/// One session runs at most one job at a time but may be reused for any
/// number of jobs in sequence. The handler only ever sees events while
/// [`Session::run_job`] is executing.
pub struct Session {
    engine: Box<dyn EngineLifecycle>,
    handler: Box<dyn EventHandler>,
    resolved: ResolvedEngine,
    running: AtomicBool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("resolved", &self.resolved)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Validates `config` and binds `engine` and `handler` together.
    ///
    /// A rejected configuration never produces a session, so nothing is
    /// marshaled or run against it.
    pub fn new<E, H>(config: &EngineConfig, engine: E, handler: H) -> Result<Self, SessionError>
    where
        E: EngineLifecycle + 'static,
        H: EventHandler + 'static,
    {
        let resolved = config.validate().inspect_err(|err| {
            warn!(error = %err, "rejected engine configuration");
        })?;

        Ok(Self {
            engine: Box::new(engine),
            handler: Box::new(handler),
            resolved,
            running: AtomicBool::new(false),
        })
    }

    pub fn engine_paths(&self) -> &ResolvedEngine {
        &self.resolved
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Runs one job with a raw argument list and blocks until it ends.
    pub fn run_job<I, T>(&self, args: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let invocation =
            JobInvocation::new(&self.resolved, args.into_iter().map(Into::into).collect());
        self.execute(&invocation)
    }

    /// Marshals `options` and runs the resulting job.
    ///
    /// Marshaling errors are returned before the engine is touched.
    pub fn run_job_with_options(&self, options: &SessionOptions) -> Result<(), SessionError> {
        let args = options.to_args()?;
        self.run_job(args)
    }

    /// Asks the running job to stop at its next checkpoint.
    pub fn stop_at_checkpoint(&self) -> Result<(), SessionError> {
        if !self.is_running() {
            return Err(SessionError::UnableToStopAtCheckpoint);
        }
        self.engine
            .stop_at_checkpoint()
            .map_err(SessionError::Engine)
    }

    /// Lists the hash types that could have produced `hash`.
    ///
    /// Independent of any running job. A hash no type matches is
    /// [`SessionError::UnidentifiedHash`].
    pub fn identify_hash(&self, hash: &str) -> Result<Vec<i64>, SessionError> {
        let hash_types = self
            .engine
            .identify_hash(&self.resolved, hash)
            .map_err(SessionError::Engine)?;
        debug!(candidates = hash_types.len(), "identified hash");

        if hash_types.is_empty() {
            return Err(SessionError::UnidentifiedHash {
                hash: hash.to_string(),
            });
        }
        Ok(hash_types)
    }

    fn execute(&self, invocation: &JobInvocation) -> Result<(), SessionError> {
        let _guard = RunningGuard::acquire(&self.running)?;
        let session = invocation.session_name().unwrap_or("-");

        info!(session, args = invocation.args.len(), "starting job");
        match self.engine.run_job(invocation, self.handler.as_ref()) {
            Ok(()) => {
                info!(session, "job finished");
                Ok(())
            }
            Err(err) => {
                warn!(session, error = %err, "job failed");
                Err(SessionError::Engine(err))
            }
        }
    }
}

/// Clears the running flag however the job ends.
struct RunningGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, SessionError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| SessionError::JobAlreadyRunning)?;
        Ok(Self { flag })
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
