use hcdriver_args::ArgsError;
use hcdriver_config::ConfigError;
use thiserror::Error;

/// Caller-facing error for everything a [`Session`](crate::Session) does.
///
/// Option, configuration and engine failures arrive through this one type so
/// callers can treat them uniformly.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Args(#[from] ArgsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unable to stop at checkpoint: no job is running")]
    UnableToStopAtCheckpoint,

    #[error("a job is already running in this session")]
    JobAlreadyRunning,

    #[error("`{hash}` does not match any known hash type")]
    UnidentifiedHash { hash: String },

    #[error(transparent)]
    Engine(anyhow::Error),
}
