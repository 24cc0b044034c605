//! The latest published snapshot.
//!
//! A refresh cycle builds a complete [`Snapshot`] and swaps it in under a
//! short write lock. Readers clone the `Arc` and keep reading their copy
//! while the next cycle publishes, so nobody ever observes half an update.

use crate::models::{ProviderStatus, SportEvent};
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Merged events and per-source health from one completed cycle.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub events: Vec<SportEvent>,
    pub provider_status: BTreeMap<String, ProviderStatus>,
    /// `None` until the first cycle has been published.
    pub last_update: Option<DateTime<Local>>,
}

/// Single-writer, many-reader holder of the current [`Snapshot`].
#[derive(Debug, Default)]
pub struct EventStore {
    current: RwLock<Arc<Snapshot>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The snapshot published most recently.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Publish `next`, returning the shared handle now visible to readers.
    pub fn replace(&self, next: Snapshot) -> Arc<Snapshot> {
        let next = Arc::new(next);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let store = EventStore::new();
        let snapshot = store.snapshot();
        assert!(snapshot.events.is_empty());
        assert!(snapshot.provider_status.is_empty());
        assert!(snapshot.last_update.is_none());
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let store = EventStore::new();
        let mut status = BTreeMap::new();
        status.insert("tvsporten".to_string(), ProviderStatus::ok(0, None));
        store.replace(Snapshot {
            events: Vec::new(),
            provider_status: status,
            last_update: Some(Local::now()),
        });

        let held = store.snapshot();
        store.replace(Snapshot::default());

        assert_eq!(held.provider_status.len(), 1);
        assert!(store.snapshot().provider_status.is_empty());
    }
}
