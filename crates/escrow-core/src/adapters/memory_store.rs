//! # In-Memory Global State
//!
//! Key-value store for one escrow instance. Production hosts back this with
//! their own persistent storage.

use crate::domain::errors::StoreError;
use crate::ports::outbound::{GlobalState, StateValue, WriteSet};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory store.
#[derive(Debug, Default)]
pub struct InMemoryGlobalState {
    values: RwLock<HashMap<String, StateValue>>,
    /// Simulate a backend outage.
    unavailable: AtomicBool,
}

impl InMemoryGlobalState {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read and commit fail until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Copy of all committed values.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, StateValue> {
        self.values.read().clone()
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store offline".to_string()));
        }
        Ok(())
    }
}

impl GlobalState for InMemoryGlobalState {
    fn get(&self, key: &str) -> Result<Option<StateValue>, StoreError> {
        self.ensure_available()?;
        Ok(self.values.read().get(key).cloned())
    }

    fn commit(&self, writes: WriteSet) -> Result<(), StoreError> {
        self.ensure_available()?;
        let mut values = self.values.write();
        for (key, value) in writes {
            values.insert(key.to_string(), value);
        }
        Ok(())
    }
}
