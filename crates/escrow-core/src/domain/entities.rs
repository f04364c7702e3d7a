//! # Domain Entities
//!
//! The escrow record and the inputs/outputs of a single invocation.

use super::value_objects::{Address, EscrowStatus, Operation, TxnType};
use serde::{Deserialize, Serialize};

/// The persisted escrow. One per contract instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowRecord {
    /// Funding party.
    pub buyer: Address,
    /// Receiving party.
    pub seller: Address,
    /// Exact escrowed value in the smallest native unit.
    pub amount: u64,
    /// Current status.
    pub status: EscrowStatus,
    /// Absolute deadline after which anyone may trigger the refund.
    pub timeout: u64,
}

impl EscrowRecord {
    /// Check whether the refund deadline has passed.
    #[must_use]
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.timeout
    }

    /// Same record with a new status.
    #[must_use]
    pub fn with_status(&self, status: EscrowStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// Creation arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowTerms {
    /// Funding party.
    pub buyer: Address,
    /// Receiving party.
    pub seller: Address,
    /// Value to escrow.
    pub amount: u64,
}

/// A request resolved by the host before the machine runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// First invocation against a fresh instance.
    Create(EscrowTerms),
    /// Deposit with a bundled payment.
    Fund,
    /// Release to seller.
    Confirm,
    /// Return to buyer.
    Refund,
    /// Report status.
    Status,
}

impl Request {
    /// Operation name used in logs and receipts.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Fund => Operation::Fund.name(),
            Self::Confirm => Operation::Confirm.name(),
            Self::Refund => Operation::Refund.name(),
            Self::Status => Operation::Status.name(),
        }
    }
}

impl From<Operation> for Request {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Fund => Self::Fund,
            Operation::Confirm => Self::Confirm,
            Operation::Refund => Self::Refund,
            Operation::Status => Self::Status,
        }
    }
}

/// A transfer bundled alongside a request, validated but not initiated by
/// the escrow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionTransfer {
    /// Transaction kind.
    pub txn_type: TxnType,
    /// Paying account.
    pub sender: Address,
    /// Receiving account.
    pub receiver: Address,
    /// Amount moved.
    pub amount: u64,
}

impl CompanionTransfer {
    /// A plain payment.
    #[must_use]
    pub fn payment(sender: Address, receiver: Address, amount: u64) -> Self {
        Self {
            txn_type: TxnType::Payment,
            sender,
            receiver,
            amount,
        }
    }
}

/// What the host tells the machine about one invocation.
#[derive(Clone, Debug)]
pub struct InvocationContext {
    /// Identity of the caller.
    pub caller: Address,
    /// Latest host timestamp.
    pub now: u64,
    /// Custody address of this escrow instance.
    pub custody: Address,
    /// Transfer bundled with the request, if any.
    pub companion: Option<CompanionTransfer>,
}

/// Outbound payment the escrow asks the host to execute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInstruction {
    /// Receiving account.
    pub receiver: Address,
    /// Amount credited to the receiver.
    pub amount: u64,
    /// Fee paid by the custody account for this transfer.
    pub fee: u64,
}

impl TransferInstruction {
    /// Total debited from custody.
    #[must_use]
    pub fn total_debit(&self) -> u64 {
        self.amount.saturating_add(self.fee)
    }
}

/// Result of an accepted request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Record to persist.
    pub record: EscrowRecord,
    /// At most one outbound transfer.
    pub transfer: Option<TransferInstruction>,
    /// Diagnostic line for the host log.
    pub log: Option<String>,
}

impl Transition {
    /// Persist `record`, no transfer, no log.
    #[must_use]
    pub fn persist(record: EscrowRecord) -> Self {
        Self {
            record,
            transfer: None,
            log: None,
        }
    }
}
