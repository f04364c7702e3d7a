//! # Domain Invariants
//!
//! Guards evaluated before a transition is accepted, and the checks every
//! accepted transition must pass.
//!
//! | Guard | Used by |
//! |-------|---------|
//! | `invariant_companion_authorized` | every request, before dispatch |
//! | `invariant_caller_is_buyer` | fund, confirm |
//! | `invariant_status_is` | fund, confirm, refund |
//! | `invariant_companion_matches` | fund |
//! | `invariant_refund_authorized` | refund |
//! | `invariant_terms_preserved` | every mutation |
//! | `invariant_status_advance` | every mutation |

use super::entities::{CompanionTransfer, EscrowRecord, Request};
use super::errors::{CompanionDefect, EscrowError};
use super::value_objects::{Address, EscrowStatus, Operation, TxnType};

/// A bundled transfer must be paid by the caller, and only fund takes one.
pub fn invariant_companion_authorized(
    request: &Request,
    caller: &Address,
    companion: Option<&CompanionTransfer>,
) -> Result<(), EscrowError> {
    let Some(companion) = companion else {
        return Ok(());
    };
    if *request != Request::Fund {
        return Err(EscrowError::MalformedCompanion(CompanionDefect::Unexpected(
            request.name(),
        )));
    }
    if companion.sender != *caller {
        return Err(EscrowError::MalformedCompanion(
            CompanionDefect::WrongSender {
                expected: *caller,
                actual: companion.sender,
            },
        ));
    }
    Ok(())
}

/// Only the buyer may fund or confirm.
pub fn invariant_caller_is_buyer(
    record: &EscrowRecord,
    caller: &Address,
    operation: Operation,
) -> Result<(), EscrowError> {
    if record.buyer != *caller {
        return Err(EscrowError::Unauthorized {
            operation,
            caller: *caller,
        });
    }
    Ok(())
}

/// The record must be in `required` for `operation` to proceed.
pub fn invariant_status_is(
    record: &EscrowRecord,
    required: EscrowStatus,
    operation: Operation,
) -> Result<(), EscrowError> {
    if record.status != required {
        return Err(EscrowError::InvalidTransition {
            from: record.status,
            operation,
        });
    }
    Ok(())
}

/// The bundled transfer must be a payment of exactly `amount` into custody.
///
/// Checked in order: presence, type, receiver, amount.
pub fn invariant_companion_matches(
    record: &EscrowRecord,
    companion: Option<&CompanionTransfer>,
    custody: &Address,
) -> Result<(), EscrowError> {
    let companion =
        companion.ok_or(EscrowError::MalformedCompanion(CompanionDefect::Missing))?;

    if companion.txn_type != TxnType::Payment {
        return Err(EscrowError::MalformedCompanion(CompanionDefect::WrongType(
            companion.txn_type,
        )));
    }
    if companion.receiver != *custody {
        return Err(EscrowError::MalformedCompanion(
            CompanionDefect::WrongReceiver {
                expected: *custody,
                actual: companion.receiver,
            },
        ));
    }
    if companion.amount != record.amount {
        return Err(EscrowError::MalformedCompanion(
            CompanionDefect::WrongAmount {
                expected: record.amount,
                actual: companion.amount,
            },
        ));
    }
    Ok(())
}

/// Buyer may refund at any time; anyone may once the deadline has passed.
pub fn invariant_refund_authorized(
    record: &EscrowRecord,
    caller: &Address,
    now: u64,
) -> Result<(), EscrowError> {
    if record.buyer == *caller || record.is_expired(now) {
        return Ok(());
    }
    Err(EscrowError::Unauthorized {
        operation: Operation::Refund,
        caller: *caller,
    })
}

/// Parties, amount and deadline never change after creation.
pub fn invariant_terms_preserved(
    before: &EscrowRecord,
    after: &EscrowRecord,
) -> Result<(), EscrowError> {
    if before.buyer != after.buyer {
        return Err(EscrowError::ImmutableFieldChanged("buyer"));
    }
    if before.seller != after.seller {
        return Err(EscrowError::ImmutableFieldChanged("seller"));
    }
    if before.amount != after.amount {
        return Err(EscrowError::ImmutableFieldChanged("amount"));
    }
    if before.timeout != after.timeout {
        return Err(EscrowError::ImmutableFieldChanged("timeout"));
    }
    Ok(())
}

/// Status only moves forward along the transition graph.
pub fn invariant_status_advance(
    before: &EscrowRecord,
    after: &EscrowRecord,
) -> Result<(), EscrowError> {
    if before.status == after.status || before.status.can_transition_to(after.status) {
        return Ok(());
    }
    Err(EscrowError::ImmutableFieldChanged("status"))
}
