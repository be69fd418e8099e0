//! Engine location settings (`[engine]` table).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

pub const SHARED_PATH_ENV: &str = "HCDRIVER_SHARED_PATH";
pub const EXECUTABLE_PATH_ENV: &str = "HCDRIVER_EXECUTABLE_PATH";

/// Where the engine binary and its shared resources (kernels, charsets,
/// hash-type tables) live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable. Falls back to the running executable when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable_path: Option<PathBuf>,

    /// Directory holding the engine's shared resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_path: Option<PathBuf>,
}

/// Engine locations after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEngine {
    pub executable_path: PathBuf,
    pub shared_path: PathBuf,
}

impl EngineConfig {
    pub fn new(shared_path: impl Into<PathBuf>) -> Self {
        Self {
            executable_path: None,
            shared_path: Some(shared_path.into()),
        }
    }

    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable_path = Some(path.into());
        self
    }

    /// Checks both locations and fills in the executable default.
    ///
    /// The shared path must be non-empty but is not checked on disk. An
    /// explicit executable path must exist.
    pub fn validate(&self) -> Result<ResolvedEngine, ConfigError> {
        let shared_path = match self.shared_path.as_deref() {
            Some(path) if !is_blank(path) => path.to_path_buf(),
            _ => return Err(ConfigError::MissingSharedResource),
        };

        let executable_path = match self.executable_path.as_deref() {
            Some(path) if !is_blank(path) => {
                if !path.exists() {
                    return Err(ConfigError::ExecutableNotFound {
                        path: path.to_path_buf(),
                    });
                }
                path.to_path_buf()
            }
            _ => std::env::current_exe().map_err(|err| ConfigError::ExecutableUnresolved {
                reason: err.to_string(),
            })?,
        };

        debug!(
            executable = %executable_path.display(),
            shared = %shared_path.display(),
            "resolved engine locations"
        );

        Ok(ResolvedEngine {
            executable_path,
            shared_path,
        })
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().is_empty()
}
