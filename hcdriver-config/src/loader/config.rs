use hcdriver_args::SessionOptions;
use serde::{Deserialize, Serialize};

use crate::debug::DebugConfig;
use crate::engine::EngineConfig;

/// Contents of `hcdriver.toml`.
///
/// ```toml
/// [engine]
/// shared_path = "/usr/local/share/hashcat"
///
/// [debug]
/// enable_tracing = true
/// trace_level = "debug"
///
/// [job]
/// hash_type = 0
/// attack_mode = 0
/// input_file = "deadbeef"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HcDriverConfig {
    pub engine: EngineConfig,
    pub debug: DebugConfig,
    /// Default options for jobs started from this configuration.
    pub job: SessionOptions,
}
