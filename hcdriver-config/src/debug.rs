//! Debug and tracing configuration

use serde::{Deserialize, Serialize};

/// Trace level for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl TraceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }
}

impl std::fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Unknown levels fall back to the default rather than failing the whole file.
impl<'de> Deserialize<'de> for TraceLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw).unwrap_or_default())
    }
}

/// Debug and tracing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Enable structured logging when `RUST_LOG` is not set
    pub enable_tracing: bool,

    /// Trace level (error, warn, info, debug, trace)
    pub trace_level: TraceLevel,

    /// Tracing targets to enable, e.g. "hcdriver_args", "hcdriver_runner::session"
    pub trace_targets: Vec<String>,
}

impl DebugConfig {
    /// `EnvFilter` directives derived from this section.
    ///
    /// Returns `None` when tracing is disabled.
    pub fn filter_directives(&self) -> Option<String> {
        if !self.enable_tracing {
            return None;
        }

        let level = self.trace_level.as_str();
        let targets: Vec<String> = self
            .trace_targets
            .iter()
            .map(|target| target.trim())
            .filter(|target| !target.is_empty())
            .map(|target| format!("{target}={level}"))
            .collect();

        if targets.is_empty() {
            Some(level.to_string())
        } else {
            Some(targets.join(","))
        }
    }
}
