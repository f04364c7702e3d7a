//! # Global State Codec
//!
//! Maps the escrow record onto five global-state keys:
//!
//! | Key | Kind | Content |
//! |-----|------|---------|
//! | `buyer` | bytes | 32-byte address |
//! | `seller` | bytes | 32-byte address |
//! | `status` | bytes | `CREATED` / `FUNDED` / `COMPLETED` / `REFUNDED` |
//! | `amount` | uint | escrowed amount |
//! | `timeout` | uint | refund deadline |

use crate::domain::entities::EscrowRecord;
use crate::domain::errors::StoreError;
use crate::domain::value_objects::{Address, EscrowStatus};
use crate::ports::outbound::{GlobalState, StateValue, WriteSet};

/// Buyer key.
pub const KEY_BUYER: &str = "buyer";
/// Seller key.
pub const KEY_SELLER: &str = "seller";
/// Amount key.
pub const KEY_AMOUNT: &str = "amount";
/// Status key.
pub const KEY_STATUS: &str = "status";
/// Timeout key.
pub const KEY_TIMEOUT: &str = "timeout";

/// Global state slots an instance must reserve at deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalStateSchema {
    /// Number of byte-slice slots.
    pub num_byte_slices: u8,
    /// Number of integer slots.
    pub num_uints: u8,
}

/// Schema of the escrow record.
pub const ESCROW_SCHEMA: GlobalStateSchema = GlobalStateSchema {
    num_byte_slices: 3,
    num_uints: 2,
};

/// Full write set for `record`.
#[must_use]
pub fn encode_record(record: &EscrowRecord) -> WriteSet {
    vec![
        (KEY_BUYER, StateValue::Bytes(record.buyer.as_bytes().to_vec())),
        (KEY_SELLER, StateValue::Bytes(record.seller.as_bytes().to_vec())),
        (KEY_AMOUNT, StateValue::Uint(record.amount)),
        (
            KEY_STATUS,
            StateValue::Bytes(record.status.label().as_bytes().to_vec()),
        ),
        (KEY_TIMEOUT, StateValue::Uint(record.timeout)),
    ]
}

/// Writes needed to move `before` to `after`.
///
/// Only the status ever changes after creation.
#[must_use]
pub fn encode_delta(before: &EscrowRecord, after: &EscrowRecord) -> WriteSet {
    encode_record(after)
        .into_iter()
        .zip(encode_record(before))
        .filter(|((_, new), (_, old))| new != old)
        .map(|(write, _)| write)
        .collect()
}

/// Read the record. `Ok(None)` means the instance has not been created.
pub fn decode_record(state: &dyn GlobalState) -> Result<Option<EscrowRecord>, StoreError> {
    let Some(status) = state.get(KEY_STATUS)? else {
        return Ok(None);
    };

    let status = status
        .as_bytes()
        .and_then(EscrowStatus::from_label)
        .ok_or(StoreError::Corrupted(KEY_STATUS))?;

    Ok(Some(EscrowRecord {
        buyer: read_address(state, KEY_BUYER)?,
        seller: read_address(state, KEY_SELLER)?,
        amount: read_uint(state, KEY_AMOUNT)?,
        status,
        timeout: read_uint(state, KEY_TIMEOUT)?,
    }))
}

fn read_address(state: &dyn GlobalState, key: &'static str) -> Result<Address, StoreError> {
    let value = state.get(key)?.ok_or(StoreError::MissingKey(key))?;
    value
        .as_bytes()
        .and_then(Address::from_slice)
        .ok_or(StoreError::Corrupted(key))
}

fn read_uint(state: &dyn GlobalState, key: &'static str) -> Result<u64, StoreError> {
    let value = state.get(key)?.ok_or(StoreError::MissingKey(key))?;
    value.as_uint().ok_or(StoreError::Corrupted(key))
}
