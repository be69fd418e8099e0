//! Job sessions for the hashcat driver.
//!
//! A [`Session`] validates the engine locations once, then runs any number of
//! jobs through an [`EngineLifecycle`] implementation, delivering each job's
//! [`EngineEvent`](hcdriver_events::EngineEvent)s to the handler registered
//! at construction. [`DryRunEngine`] stands in for the native engine in tests
//! and dry runs.

pub mod collector;
pub mod error;
pub mod executor;
pub mod session;

pub use collector::CrackedCollector;
pub use error::SessionError;
pub use executor::{DryRunEngine, EngineLifecycle, JobInvocation};
pub use session::Session;
