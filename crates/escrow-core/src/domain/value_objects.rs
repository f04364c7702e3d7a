//! # Domain Value Objects
//!
//! Immutable value types for the escrow: identities, the status state
//! machine, transaction kinds and operation names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::EscrowError;

/// 32-byte account identity.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create an address from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build an address from a byte slice of exactly 32 bytes.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; 32]>::try_from(bytes).ok().map(Self)
    }

    /// Raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Abbreviated form for log lines, e.g. `abcdef...1234`.
    #[must_use]
    pub fn short(&self) -> String {
        let full = hex::encode(self.0);
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.short())
    }
}

/// Escrow status state machine.
///
/// ```text
/// CREATED ──fund──▶ FUNDED ──confirm──▶ COMPLETED
///                     │
///                     └──refund──▶ REFUNDED
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscrowStatus {
    /// Terms recorded, nothing deposited yet.
    #[default]
    Created,
    /// Buyer deposited exactly `amount` into custody.
    Funded,
    /// Seller paid out.
    Completed,
    /// Buyer paid back.
    Refunded,
}

impl EscrowStatus {
    /// All statuses, in transition order.
    pub const ALL: [Self; 4] = [Self::Created, Self::Funded, Self::Completed, Self::Refunded];

    /// Label stored in global state and reported by `status`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Funded => "FUNDED",
            Self::Completed => "COMPLETED",
            Self::Refunded => "REFUNDED",
        }
    }

    /// Parse a stored label.
    #[must_use]
    pub fn from_label(bytes: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label().as_bytes() == bytes)
    }

    /// Check if transition is valid.
    #[must_use]
    pub fn can_transition_to(&self, next: EscrowStatus) -> bool {
        matches!(
            (self, next),
            (Self::Created, Self::Funded)
                | (Self::Funded, Self::Completed)
                | (Self::Funded, Self::Refunded)
        )
    }

    /// Check if terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Refunded)
    }
}

impl fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kinds of transaction the host can bundle with a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxnType {
    /// Native currency payment.
    Payment,
    /// Transfer of a non-native asset.
    AssetTransfer,
    /// Call into an application.
    ApplicationCall,
    /// Participation key registration.
    KeyRegistration,
}

impl fmt::Display for TxnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Payment => "payment",
            Self::AssetTransfer => "asset_transfer",
            Self::ApplicationCall => "application_call",
            Self::KeyRegistration => "key_registration",
        };
        f.write_str(name)
    }
}

/// Operations callable after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Buyer deposits the escrowed amount.
    Fund,
    /// Buyer releases the deposit to the seller.
    Confirm,
    /// Deposit returns to the buyer.
    Refund,
    /// Read-only status report.
    Status,
}

impl Operation {
    /// Dispatch name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fund => "fund",
            Self::Confirm => "confirm",
            Self::Refund => "refund",
            Self::Status => "status",
        }
    }

    /// Resolve a raw dispatch argument.
    pub fn from_arg(arg: &[u8]) -> Result<Self, EscrowError> {
        std::str::from_utf8(arg)
            .map_err(|_| EscrowError::UnknownOperation(String::from_utf8_lossy(arg).into_owned()))?
            .parse()
    }
}

impl FromStr for Operation {
    type Err = EscrowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fund" => Ok(Self::Fund),
            "confirm" => Ok(Self::Confirm),
            "refund" => Ok(Self::Refund),
            "status" => Ok(Self::Status),
            other => Err(EscrowError::UnknownOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
