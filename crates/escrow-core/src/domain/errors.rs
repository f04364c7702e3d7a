//! # Domain Errors
//!
//! Every rejection the escrow can produce. A rejected request carries no
//! partial effect: the host discards the staged writes and transfers.

use super::value_objects::{Address, EscrowStatus, Operation, TxnType};
use thiserror::Error;

/// Why a companion transfer bundled with `fund` was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompanionDefect {
    /// No transfer was bundled with the request.
    #[error("no companion transfer attached")]
    Missing,

    /// The request does not take a companion transfer.
    #[error("{0} does not accept a companion transfer")]
    Unexpected(&'static str),

    /// The payment is not paid by the invoking account.
    #[error("companion payment sender {actual} is not caller {expected}")]
    WrongSender {
        /// Invoking account.
        expected: Address,
        /// Sender named in the payment.
        actual: Address,
    },

    /// The bundled transfer is not a plain payment.
    #[error("companion transfer type is {0}, expected payment")]
    WrongType(TxnType),

    /// The payment does not go to the escrow custody address.
    #[error("companion payment receiver {actual} is not custody address {expected}")]
    WrongReceiver {
        /// Custody address of this escrow.
        expected: Address,
        /// Receiver named in the payment.
        actual: Address,
    },

    /// The payment amount differs from the escrowed amount.
    #[error("companion payment amount {actual} does not equal escrow amount {expected}")]
    WrongAmount {
        /// Escrowed amount.
        expected: u64,
        /// Amount carried by the payment.
        actual: u64,
    },
}

/// Escrow state machine errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscrowError {
    /// Caller identity does not satisfy the operation's guard.
    #[error("unauthorized caller {caller} for {operation}")]
    Unauthorized {
        /// Operation that was attempted.
        operation: Operation,
        /// Identity of the caller.
        caller: Address,
    },

    /// Operation requested while the record is not in the required source state.
    #[error("cannot {operation} while escrow is {from}")]
    InvalidTransition {
        /// Current status.
        from: EscrowStatus,
        /// Operation that was attempted.
        operation: Operation,
    },

    /// Companion transfer does not match the required exact values.
    #[error("malformed companion transfer: {0}")]
    MalformedCompanion(CompanionDefect),

    /// Dispatch argument names no known operation.
    #[error("unknown operation: {0:?}")]
    UnknownOperation(String),

    /// A non-creating invocation arrived without a dispatch argument.
    #[error("missing operation argument")]
    MissingOperation,

    /// Create requested against an already initialized record.
    #[error("escrow already initialized")]
    AlreadyInitialized,

    /// Operation requested before the record was created.
    #[error("escrow not initialized")]
    NotInitialized,

    /// Amount cannot cover the fixed outbound fee.
    #[error("escrow amount {amount} must exceed fixed fee {fee}")]
    AmountNotAboveFee {
        /// Requested escrow amount.
        amount: u64,
        /// Fixed fee per outbound transfer.
        fee: u64,
    },

    /// Creation arguments could not be decoded.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// A transition tried to alter an immutable term.
    #[error("immutable field changed: {0}")]
    ImmutableFieldChanged(&'static str),

    /// Persisted state could not be read or written.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The host could not settle the request's payments.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl EscrowError {
    /// Returns true if the caller can fix the request by reissuing it
    /// (different identity, later time, exact amount).
    #[must_use]
    pub fn is_caller_correctable(&self) -> bool {
        !matches!(
            self,
            Self::Store(_) | Self::Ledger(_) | Self::ImmutableFieldChanged(_)
        )
    }
}

/// Errors from the key-value store backing the escrow record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A required key is absent from an otherwise initialized record.
    #[error("missing key: {0}")]
    MissingKey(&'static str),

    /// A key holds a value of the wrong kind or an undecodable value.
    #[error("corrupted value at key: {0}")]
    Corrupted(&'static str),

    /// Store backend failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from settling payments on the host ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// An account cannot cover a debit.
    #[error("insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        /// Debited account.
        account: Address,
        /// Amount required including fee.
        required: u64,
        /// Balance available.
        available: u64,
    },

    /// A credit would overflow the receiving balance.
    #[error("balance overflow for {0}")]
    Overflow(Address),
}
