//! # Payout Policy
//!
//! Every outbound transfer moves `amount - fixed_fee` to the recipient and
//! pays `fixed_fee` as the transfer's own fee, so custody is drained by
//! exactly `amount`.

use super::errors::EscrowError;

/// Fixed fee charged by the host per outbound transfer.
pub const DEFAULT_FIXED_FEE: u64 = 1_000;

/// Split of the escrowed amount for one outbound transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    /// Credited to the recipient.
    pub recipient_amount: u64,
    /// Paid as the outbound transfer's fee.
    pub fee: u64,
}

/// Compute the payout for `amount` under a fixed fee.
///
/// Fails when `amount <= fixed_fee`: such a transfer would pay the
/// recipient nothing or underflow.
pub fn payout(amount: u64, fixed_fee: u64) -> Result<Payout, EscrowError> {
    match amount.checked_sub(fixed_fee) {
        Some(recipient_amount) if recipient_amount > 0 => Ok(Payout {
            recipient_amount,
            fee: fixed_fee,
        }),
        _ => Err(EscrowError::AmountNotAboveFee {
            amount,
            fee: fixed_fee,
        }),
    }
}
