//! Configuration for the hashcat driver.
//!
//! Settings come from layered `hcdriver.toml` files (user, `.hcdriver/`,
//! workspace root), `HCDRIVER_*` environment variables and `--set`
//! overrides, merged by [`ConfigBuilder`]. The `[engine]` table is checked
//! by [`EngineConfig::validate`] before any job is started.

pub mod debug;
pub mod engine;
pub mod error;
pub mod loader;

pub use debug::{DebugConfig, TraceLevel};
pub use engine::{EXECUTABLE_PATH_ENV, EngineConfig, ResolvedEngine, SHARED_PATH_ENV};
pub use error::ConfigError;
pub use loader::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, ConfigBuilder, ConfigManager, HcDriverConfig,
    default_user_config_path, merge_toml_values, split_override,
};
