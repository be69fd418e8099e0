//! Structured progress events reported by the hashcat engine.
//!
//! The engine lifecycle reports exactly five kinds of payload while a job
//! runs: log lines, lifecycle actions, cracked credentials, the final status
//! snapshot and task metadata. This crate exposes their serialized schema
//! together with the [`EventHandler`] contract callers implement to receive
//! them, without depending on the engine driver itself.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Semantic version of the serialized event schema exported by this crate.
pub const EVENT_SCHEMA_VERSION: &str = "0.1.0";

/// Wraps an [`EngineEvent`] with schema metadata so downstream consumers can
/// negotiate compatibility before processing an event stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionedEngineEvent {
    /// Semantic version describing the schema of the nested event payload.
    pub schema_version: String,
    /// Concrete event reported by the engine.
    pub event: EngineEvent,
}

impl VersionedEngineEvent {
    /// Creates a new [`VersionedEngineEvent`] using the current
    /// [`EVENT_SCHEMA_VERSION`].
    pub fn new(event: EngineEvent) -> Self {
        Self {
            schema_version: EVENT_SCHEMA_VERSION.to_string(),
            event,
        }
    }
}

impl From<EngineEvent> for VersionedEngineEvent {
    fn from(event: EngineEvent) -> Self {
        Self::new(event)
    }
}

/// Receiver for the events of a running job.
///
/// The engine invokes the handler once per event, in emission order for a
/// given job, and does not advance until the call returns. Invocations may
/// happen on any thread, so implementations that keep state across calls
/// must synchronise it themselves.
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &EngineEvent);
}

impl<F> EventHandler for F
where
    F: Fn(&EngineEvent) + Send + Sync,
{
    fn handle(&self, event: &EngineEvent) {
        self(event);
    }
}

/// Handler that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl EventHandler for NoopHandler {
    fn handle(&self, _event: &EngineEvent) {}
}

/// Handler that keeps every event in memory, mostly useful in tests.
#[derive(Debug, Default)]
pub struct MemoryHandler {
    events: Mutex<Vec<EngineEvent>>,
}

impl MemoryHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far, in arrival order.
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().clone()
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventHandler for MemoryHandler {
    fn handle(&self, event: &EngineEvent) {
        self.events.lock().push(event.clone());
    }
}

/// JSON output for engine events.
#[cfg(feature = "serde-json")]
pub mod json {
    use std::io::{self, Write};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::{EngineEvent, EventHandler, VersionedEngineEvent};

    /// Serializes an event inside its [`VersionedEngineEvent`] envelope.
    pub fn versioned_to_string(event: &EngineEvent) -> serde_json::Result<String> {
        serde_json::to_string(&VersionedEngineEvent::from(event.clone()))
    }

    /// Writes every event as one versioned JSON object per line.
    ///
    /// Write failures are counted, not raised; see [`Self::failures`].
    #[derive(Debug)]
    pub struct JsonLinesHandler<W> {
        writer: Mutex<W>,
        failures: AtomicUsize,
    }

    impl<W: Write + Send> JsonLinesHandler<W> {
        pub fn new(writer: W) -> Self {
            Self {
                writer: Mutex::new(writer),
                failures: AtomicUsize::new(0),
            }
        }

        /// Serializes and writes one event, flushing after the newline.
        pub fn write_event(&self, event: &EngineEvent) -> io::Result<()> {
            let payload = versioned_to_string(event).map_err(io::Error::other)?;
            let mut writer = self.writer.lock();
            writer.write_all(payload.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()
        }

        /// Number of events that could not be written.
        pub fn failures(&self) -> usize {
            self.failures.load(Ordering::Relaxed)
        }

        pub fn into_inner(self) -> W {
            self.writer.into_inner()
        }
    }

    impl<W: Write + Send> EventHandler for JsonLinesHandler<W> {
        fn handle(&self, event: &EngineEvent) {
            if self.write_event(event).is_err() {
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(feature = "serde-json")]
pub use json::JsonLinesHandler;

#[cfg(feature = "telemetry-tracing")]
mod tracing_support {
    use tracing::Level;

    use super::{EVENT_SCHEMA_VERSION, EngineEvent, EventHandler};

    /// Forwards engine events to `tracing` at a fixed level.
    #[derive(Debug, Clone)]
    pub struct TracingHandler {
        level: Level,
    }

    impl TracingHandler {
        /// Creates a new [`TracingHandler`] with the provided [`Level`].
        pub fn new(level: Level) -> Self {
            Self { level }
        }
    }

    impl Default for TracingHandler {
        fn default() -> Self {
            Self { level: Level::INFO }
        }
    }

    impl EventHandler for TracingHandler {
        fn handle(&self, event: &EngineEvent) {
            let kind = event.kind().as_str();
            match self.level {
                Level::TRACE => tracing::event!(
                    target: "hcdriver_events",
                    Level::TRACE,
                    schema_version = EVENT_SCHEMA_VERSION,
                    kind,
                    event = ?event,
                    "engine_event"
                ),
                Level::DEBUG => tracing::event!(
                    target: "hcdriver_events",
                    Level::DEBUG,
                    schema_version = EVENT_SCHEMA_VERSION,
                    kind,
                    event = ?event,
                    "engine_event"
                ),
                Level::INFO => tracing::event!(
                    target: "hcdriver_events",
                    Level::INFO,
                    schema_version = EVENT_SCHEMA_VERSION,
                    kind,
                    event = ?event,
                    "engine_event"
                ),
                Level::WARN => tracing::event!(
                    target: "hcdriver_events",
                    Level::WARN,
                    schema_version = EVENT_SCHEMA_VERSION,
                    kind,
                    event = ?event,
                    "engine_event"
                ),
                Level::ERROR => tracing::event!(
                    target: "hcdriver_events",
                    Level::ERROR,
                    schema_version = EVENT_SCHEMA_VERSION,
                    kind,
                    event = ?event,
                    "engine_event"
                ),
            }
        }
    }
}

#[cfg(feature = "telemetry-tracing")]
pub use tracing_support::TracingHandler;

/// Progress reported by the engine while a job runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// Free-form log line.
    Log(LogEvent),
    /// Engine lifecycle transition.
    Action(ActionEvent),
    /// A hash was recovered.
    Cracked(CrackedEvent),
    /// Status snapshot taken when the job ended.
    FinalStatus(FinalStatusEvent),
    /// Description of the task the engine is about to run.
    TaskInformation(TaskInformationEvent),
}

impl EngineEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Log(_) => EventKind::Log,
            Self::Action(_) => EventKind::Action,
            Self::Cracked(_) => EventKind::Cracked,
            Self::FinalStatus(_) => EventKind::FinalStatus,
            Self::TaskInformation(_) => EventKind::TaskInformation,
        }
    }
}

/// Discriminant of [`EngineEvent`], handy for filtering and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Log,
    Action,
    Cracked,
    FinalStatus,
    TaskInformation,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Action => "action",
            Self::Cracked => "cracked",
            Self::FinalStatus => "final_status",
            Self::TaskInformation => "task_information",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    #[default]
    Info,
    Warning,
    Error,
    Advice,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Advice => "ADVICE",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionEvent {
    /// Engine-defined lifecycle event identifier.
    pub event_code: u32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrackedEvent {
    /// Hash (or identifier) as it appeared in the job input.
    pub hash: String,
    /// Recovered plaintext.
    pub value: String,
    /// Session the credential was recovered in, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    pub cracked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinalStatusEvent {
    /// Engine status snapshot, passed through without interpretation.
    pub status: Value,
    #[serde(default)]
    pub all_hashes_cracked: bool,
    pub ended_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TaskInformationEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_mode: Option<i64>,
    #[serde(default)]
    pub device_count: u32,
    /// Any further descriptive fields the engine reports.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}
