use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration or resolving engine paths.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no shared resource path configured for the engine")]
    MissingSharedResource,

    #[error("engine executable not found at {}", path.display())]
    ExecutableNotFound { path: PathBuf },

    #[error("unable to resolve the engine executable: {reason}")]
    ExecutableUnresolved { reason: String },

    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("effective configuration is invalid")]
    Invalid {
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid override `{key}`: {reason}")]
    Override { key: String, reason: String },
}
