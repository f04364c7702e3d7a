//! Custody address derivation.
//!
//! Each application instance owns an account that holds escrowed funds.
//! Its address is `SHA-256("appID" || app_id as big-endian u64)`.

use crate::domain::value_objects::Address;
use sha2::{Digest, Sha256};

const APP_ID_PREFIX: &[u8] = b"appID";

/// Custody address for application `app_id`.
#[must_use]
pub fn application_address(app_id: u64) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(APP_ID_PREFIX);
    hasher.update(app_id.to_be_bytes());
    Address::new(hasher.finalize().into())
}
