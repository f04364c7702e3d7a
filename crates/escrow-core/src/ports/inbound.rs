//! # Driving Ports (API - Inbound)
//!
//! The operation surface exposed to callers. Each call either commits in
//! full and returns a receipt, or is rejected with no effect.

use crate::domain::entities::{CompanionTransfer, EscrowTerms, Request, TransferInstruction};
use crate::domain::errors::EscrowError;
use crate::domain::value_objects::{Address, EscrowStatus};
use serde::Serialize;
use uuid::Uuid;

/// Outcome of an accepted invocation.
#[derive(Clone, Debug, Serialize)]
pub struct InvocationReceipt {
    /// Correlation id of this invocation (also on its tracing span).
    pub correlation_id: Uuid,
    /// Operation that ran.
    pub operation: &'static str,
    /// Status after commit.
    pub status: EscrowStatus,
    /// Outbound transfer settled as part of the commit.
    pub transfer: Option<TransferInstruction>,
    /// Diagnostic lines recorded by the invocation.
    pub logs: Vec<String>,
}

/// Primary API of an escrow instance.
///
/// ## Usage
///
/// ```ignore
/// api.create(creator, terms)?;
/// api.fund(buyer, CompanionTransfer::payment(buyer, custody, amount))?;
/// let receipt = api.confirm(buyer)?;
/// ```
pub trait EscrowApi: Send + Sync {
    /// Invoke with raw application arguments, as a host would.
    ///
    /// The first invocation against a fresh instance is always create,
    /// whatever the arguments say. Later invocations dispatch on `args[0]`.
    fn invoke(
        &self,
        caller: Address,
        args: &[Vec<u8>],
        companion: Option<CompanionTransfer>,
    ) -> Result<InvocationReceipt, EscrowError>;

    /// Submit an already resolved request.
    fn submit(
        &self,
        caller: Address,
        request: Request,
        companion: Option<CompanionTransfer>,
    ) -> Result<InvocationReceipt, EscrowError>;

    /// Create the escrow.
    fn create(&self, caller: Address, terms: EscrowTerms) -> Result<InvocationReceipt, EscrowError> {
        self.submit(caller, Request::Create(terms), None)
    }

    /// Fund with an accompanying payment.
    fn fund(
        &self,
        caller: Address,
        payment: CompanionTransfer,
    ) -> Result<InvocationReceipt, EscrowError> {
        self.submit(caller, Request::Fund, Some(payment))
    }

    /// Release the deposit to the seller.
    fn confirm(&self, caller: Address) -> Result<InvocationReceipt, EscrowError> {
        self.submit(caller, Request::Confirm, None)
    }

    /// Return the deposit to the buyer.
    fn refund(&self, caller: Address) -> Result<InvocationReceipt, EscrowError> {
        self.submit(caller, Request::Refund, None)
    }

    /// Report the current status.
    fn status(&self, caller: Address) -> Result<InvocationReceipt, EscrowError> {
        self.submit(caller, Request::Status, None)
    }
}
