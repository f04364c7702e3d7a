//! # Escrow State Machine
//!
//! Pure transition function: current record + request + caller context in,
//! next record + optional transfer instruction out. No I/O, no clock, no
//! storage. The host persists the result only if `apply` returns `Ok`.

use super::entities::{
    EscrowRecord, EscrowTerms, InvocationContext, Request, TransferInstruction, Transition,
};
use super::errors::EscrowError;
use super::invariants::{
    invariant_caller_is_buyer, invariant_companion_matches, invariant_refund_authorized,
    invariant_status_advance, invariant_status_is, invariant_terms_preserved,
};
use super::payout::payout;
use super::value_objects::{Address, EscrowStatus, Operation};
use crate::config::EscrowConfig;

/// The escrow transition function, parameterised by fee and timeout policy.
#[derive(Clone, Debug, Default)]
pub struct EscrowStateMachine {
    config: EscrowConfig,
}

impl EscrowStateMachine {
    /// Create a machine with the given policy.
    #[must_use]
    pub fn new(config: EscrowConfig) -> Self {
        Self { config }
    }

    /// Active policy.
    #[must_use]
    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    /// Apply `request` to `current`.
    ///
    /// `current` is `None` only before the first invocation. Create is
    /// accepted exactly then; every other request needs an existing record.
    pub fn apply(
        &self,
        current: Option<&EscrowRecord>,
        request: &Request,
        ctx: &InvocationContext,
    ) -> Result<Transition, EscrowError> {
        let (record, transition) = match (current, request) {
            (None, Request::Create(terms)) => return self.create(terms, ctx.now),
            (Some(_), Request::Create(_)) => return Err(EscrowError::AlreadyInitialized),
            (None, _) => return Err(EscrowError::NotInitialized),
            (Some(record), Request::Fund) => (record, self.fund(record, ctx)?),
            (Some(record), Request::Confirm) => (record, self.confirm(record, &ctx.caller)?),
            (Some(record), Request::Refund) => {
                (record, self.refund(record, &ctx.caller, ctx.now)?)
            }
            (Some(record), Request::Status) => (record, Self::status(record)),
        };

        invariant_terms_preserved(record, &transition.record)?;
        invariant_status_advance(record, &transition.record)?;
        Ok(transition)
    }

    /// Initialise the record. No transfer.
    fn create(&self, terms: &EscrowTerms, now: u64) -> Result<Transition, EscrowError> {
        // amount must cover the payout fee
        payout(terms.amount, self.config.fixed_fee)?;

        let timeout = now
            .checked_add(self.config.timeout_offset_secs)
            .ok_or_else(|| EscrowError::InvalidArguments("timeout overflows".to_string()))?;

        Ok(Transition::persist(EscrowRecord {
            buyer: terms.buyer,
            seller: terms.seller,
            amount: terms.amount,
            status: EscrowStatus::Created,
            timeout,
        }))
    }

    /// `CREATED -> FUNDED`, guarded by caller, status and the bundled payment.
    fn fund(
        &self,
        record: &EscrowRecord,
        ctx: &InvocationContext,
    ) -> Result<Transition, EscrowError> {
        invariant_caller_is_buyer(record, &ctx.caller, Operation::Fund)?;
        invariant_status_is(record, EscrowStatus::Created, Operation::Fund)?;
        invariant_companion_matches(record, ctx.companion.as_ref(), &ctx.custody)?;
        // Stored records created under a different fee policy.
        payout(record.amount, self.config.fixed_fee)?;

        Ok(Transition::persist(record.with_status(EscrowStatus::Funded)))
    }

    /// `FUNDED -> COMPLETED`, paying the seller.
    fn confirm(&self, record: &EscrowRecord, caller: &Address) -> Result<Transition, EscrowError> {
        invariant_caller_is_buyer(record, caller, Operation::Confirm)?;
        invariant_status_is(record, EscrowStatus::Funded, Operation::Confirm)?;

        Ok(Transition {
            record: record.with_status(EscrowStatus::Completed),
            transfer: Some(self.transfer_to(record.seller, record.amount)?),
            log: None,
        })
    }

    /// `FUNDED -> REFUNDED`, paying the buyer back.
    fn refund(
        &self,
        record: &EscrowRecord,
        caller: &Address,
        now: u64,
    ) -> Result<Transition, EscrowError> {
        invariant_refund_authorized(record, caller, now)?;
        invariant_status_is(record, EscrowStatus::Funded, Operation::Refund)?;

        Ok(Transition {
            record: record.with_status(EscrowStatus::Refunded),
            transfer: Some(self.transfer_to(record.buyer, record.amount)?),
            log: None,
        })
    }

    /// Read-only report.
    fn status(record: &EscrowRecord) -> Transition {
        Transition {
            record: record.clone(),
            transfer: None,
            log: Some(format!("Status:{}", record.status.label())),
        }
    }

    fn transfer_to(&self, receiver: Address, amount: u64) -> Result<TransferInstruction, EscrowError> {
        let split = payout(amount, self.config.fixed_fee)?;
        Ok(TransferInstruction {
            receiver,
            amount: split.recipient_amount,
            fee: split.fee,
        })
    }
}
