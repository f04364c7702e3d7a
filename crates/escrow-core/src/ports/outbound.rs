//! # Driven Ports (SPI - Outbound)
//!
//! What the escrow needs from the host platform:
//! - A per-instance key-value store surviving across invocations
//! - A ledger that settles payments atomically with the request
//! - A monotonically non-decreasing clock

use crate::domain::errors::{LedgerError, StoreError};
use crate::domain::value_objects::Address;
use serde::{Deserialize, Serialize};

// =============================================================================
// GLOBAL STATE
// =============================================================================

/// A value held in the host key-value store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateValue {
    /// Byte slice value.
    Bytes(Vec<u8>),
    /// Unsigned integer value.
    Uint(u64),
}

impl StateValue {
    /// Bytes, if this is a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            Self::Uint(_) => None,
        }
    }

    /// Integer, if this is a uint.
    #[must_use]
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            Self::Bytes(_) => None,
        }
    }
}

/// Staged writes for one request, applied together or not at all.
pub type WriteSet = Vec<(&'static str, StateValue)>;

/// Per-instance key-value store.
///
/// Reads see only committed state. `commit` must apply every write in the
/// set or none of them.
pub trait GlobalState: Send + Sync {
    /// Read a key.
    fn get(&self, key: &str) -> Result<Option<StateValue>, StoreError>;

    /// Apply a write set atomically.
    fn commit(&self, writes: WriteSet) -> Result<(), StoreError>;
}

// =============================================================================
// LEDGER
// =============================================================================

/// One native-currency movement settled by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Debited account.
    pub sender: Address,
    /// Credited account.
    pub receiver: Address,
    /// Amount credited to the receiver.
    pub amount: u64,
    /// Fee debited from the sender on top of `amount`.
    pub fee: u64,
}

/// Host ledger.
pub trait Ledger: Send + Sync {
    /// Current balance of an account (zero if unknown).
    fn balance(&self, account: &Address) -> u64;

    /// Check that `payments`, applied in order, would all succeed.
    fn check(&self, payments: &[Payment]) -> Result<(), LedgerError>;

    /// Settle `payments` in order, all or nothing.
    fn settle(&self, payments: &[Payment]) -> Result<(), LedgerError>;
}

// =============================================================================
// CLOCK
// =============================================================================

/// Host time source. Never goes backwards.
pub trait Clock: Send + Sync {
    /// Latest timestamp in seconds.
    fn latest_timestamp(&self) -> u64;
}
