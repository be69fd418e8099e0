use std::collections::BTreeMap;
use std::sync::Arc;

use hcdriver_events::{EngineEvent, EventHandler};
use parking_lot::Mutex;

/// Handler that keeps the plaintext of every cracked hash.
///
/// Clones share one map, so a clone can be handed to a [`Session`] while the
/// caller keeps another to read results. Results accumulate across jobs;
/// a hash cracked twice keeps its latest value.
///
/// [`Session`]: crate::Session
#[derive(Debug, Clone, Default)]
pub struct CrackedCollector {
    cracked: Arc<Mutex<BTreeMap<String, String>>>,
}

impl CrackedCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hash: &str) -> Option<String> {
        self.cracked.lock().get(hash).cloned()
    }

    pub fn len(&self) -> usize {
        self.cracked.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cracked.lock().is_empty()
    }

    /// Copy of everything collected so far, keyed by hash.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.cracked.lock().clone()
    }
}

impl EventHandler for CrackedCollector {
    fn handle(&self, event: &EngineEvent) {
        if let EngineEvent::Cracked(cracked) = event {
            self.cracked
                .lock()
                .insert(cracked.hash.clone(), cracked.value.clone());
        }
    }
}
