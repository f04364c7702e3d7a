//! Clock adapters.

use crate::ports::outbound::Clock;
use parking_lot::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall clock in unix seconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn latest_timestamp(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Settable clock for tests and simulations.
///
/// Only moves forward: `set_time` to an earlier value is ignored.
#[derive(Debug)]
pub struct ManualClock {
    current_time: RwLock<u64>,
}

impl ManualClock {
    /// Start at `time`.
    #[must_use]
    pub fn new(time: u64) -> Self {
        Self {
            current_time: RwLock::new(time),
        }
    }

    /// Set current time (monotonic).
    pub fn set_time(&self, time: u64) {
        let mut current = self.current_time.write();
        *current = (*current).max(time);
    }

    /// Advance time by `secs`.
    pub fn advance_time(&self, secs: u64) {
        let mut current = self.current_time.write();
        *current = current.saturating_add(secs);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(1_700_000_000)
    }
}

impl Clock for ManualClock {
    fn latest_timestamp(&self) -> u64 {
        *self.current_time.read()
    }
}
