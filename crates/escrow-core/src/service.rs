//! # Escrow Service
//!
//! Host-side invocation driver. For each request it reads the stored record,
//! resolves the request, runs the state machine, and commits the record
//! writes and payments together. Requests are serialized: one is fully
//! processed before the next is admitted.
//!
//! A rejected request commits nothing. The companion payment, the outbound
//! transfer and the status write either all land or none do.

use crate::adapters::state_codec::{decode_record, encode_delta, encode_record};
use crate::adapters::{application_address, InMemoryGlobalState, InMemoryLedger, ManualClock};
use crate::config::EscrowConfig;
use crate::domain::entities::{
    CompanionTransfer, EscrowRecord, EscrowTerms, InvocationContext, Request, Transition,
};
use crate::domain::errors::EscrowError;
use crate::domain::invariants::invariant_companion_authorized;
use crate::domain::machine::EscrowStateMachine;
use crate::domain::value_objects::{Address, Operation};
use crate::ports::inbound::{EscrowApi, InvocationReceipt};
use crate::ports::outbound::{Clock, GlobalState, Ledger, Payment};

use escrow_telemetry::log_escrow_event;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Counters for the service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Invocations committed.
    pub accepted: u64,
    /// Invocations rejected.
    pub rejected: u64,
    /// Outbound transfers settled.
    pub transfers_emitted: u64,
}

/// Escrow service over a store, a ledger and a clock.
pub struct EscrowService<S: GlobalState, L: Ledger, C: Clock> {
    machine: EscrowStateMachine,
    custody: Address,
    state: Arc<S>,
    ledger: Arc<L>,
    clock: Arc<C>,
    /// Serializes invocations.
    gate: Mutex<()>,
    stats: RwLock<ServiceStats>,
}

impl<S: GlobalState, L: Ledger, C: Clock> EscrowService<S, L, C> {
    /// Create a service for application `config.app_id`.
    pub fn new(config: EscrowConfig, state: Arc<S>, ledger: Arc<L>, clock: Arc<C>) -> Self {
        let custody = application_address(config.app_id);
        info!(
            app_id = config.app_id,
            custody = %custody.short(),
            fixed_fee = config.fixed_fee,
            timeout_offset_secs = config.timeout_offset_secs,
            "Escrow service initialised"
        );
        Self {
            machine: EscrowStateMachine::new(config),
            custody,
            state,
            ledger,
            clock,
            gate: Mutex::new(()),
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Custody address holding the escrowed funds.
    pub fn custody(&self) -> Address {
        self.custody
    }

    /// Underlying store.
    pub fn state(&self) -> &Arc<S> {
        &self.state
    }

    /// Underlying ledger.
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Underlying clock.
    pub fn clock(&self) -> &Arc<C> {
        &self.clock
    }

    /// Current service statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Committed record, if the instance has been created.
    pub fn record(&self) -> Result<Option<EscrowRecord>, EscrowError> {
        Ok(decode_record(self.state.as_ref())?)
    }

    /// Run one invocation under the gate and account for it.
    fn run<F>(
        &self,
        caller: Address,
        companion: Option<CompanionTransfer>,
        resolve: F,
    ) -> Result<InvocationReceipt, EscrowError>
    where
        F: FnOnce(Option<&EscrowRecord>) -> Result<Request, EscrowError>,
    {
        let correlation_id = Uuid::new_v4();
        let _gate = self.gate.lock();
        let result = self.execute(correlation_id, caller, companion, resolve);

        let mut stats = self.stats.write();
        match &result {
            Ok(receipt) => {
                stats.accepted += 1;
                if receipt.transfer.is_some() {
                    stats.transfers_emitted += 1;
                }
            }
            Err(_) => stats.rejected += 1,
        }
        result
    }

    #[instrument(skip_all, fields(correlation_id = %correlation_id, caller = %caller.short()))]
    fn execute<F>(
        &self,
        correlation_id: Uuid,
        caller: Address,
        companion: Option<CompanionTransfer>,
        resolve: F,
    ) -> Result<InvocationReceipt, EscrowError>
    where
        F: FnOnce(Option<&EscrowRecord>) -> Result<Request, EscrowError>,
    {
        let current = decode_record(self.state.as_ref())?;
        let request = resolve(current.as_ref()).inspect_err(|e| {
            warn!(error = %e, "Rejected unresolvable invocation");
        })?;

        let status = current.as_ref().map_or("NONE", |r| r.status.label());
        invariant_companion_authorized(&request, &caller, companion.as_ref()).inspect_err(|e| {
            log_escrow_event!(warn, "Companion transfer refused", request.name(), status, error = %e);
        })?;

        let ctx = InvocationContext {
            caller,
            now: self.clock.latest_timestamp(),
            custody: self.custody,
            companion: companion.clone(),
        };

        let transition = self
            .machine
            .apply(current.as_ref(), &request, &ctx)
            .inspect_err(|e| {
                log_escrow_event!(warn, "Escrow request rejected", request.name(), status, error = %e);
            })?;

        self.commit(current.as_ref(), &transition, companion.as_ref())?;

        if let Some(line) = &transition.log {
            info!(target: "escrow::log", "{line}");
        }
        let closed = transition.record.status.is_terminal()
            && current.as_ref().is_some_and(|r| !r.status.is_terminal());
        log_escrow_event!(
            info,
            "Escrow request committed",
            request.name(),
            transition.record.status,
            closed = closed,
            transfer_amount = transition.transfer.as_ref().map(|t| t.amount)
        );

        Ok(InvocationReceipt {
            correlation_id,
            operation: request.name(),
            status: transition.record.status,
            transfer: transition.transfer,
            logs: transition.log.into_iter().collect(),
        })
    }

    /// Stage writes and payments, verify the payments settle, then apply both.
    ///
    /// If settlement fails after the store write, the previous status is
    /// written back before the ledger error is returned.
    fn commit(
        &self,
        current: Option<&EscrowRecord>,
        transition: &Transition,
        companion: Option<&CompanionTransfer>,
    ) -> Result<(), EscrowError> {
        let writes = match current {
            None => encode_record(&transition.record),
            Some(before) => encode_delta(before, &transition.record),
        };

        let mut payments = Vec::with_capacity(2);
        if let Some(companion) = companion {
            payments.push(Payment {
                sender: companion.sender,
                receiver: companion.receiver,
                amount: companion.amount,
                fee: 0,
            });
        }
        if let Some(transfer) = &transition.transfer {
            payments.push(Payment {
                sender: self.custody,
                receiver: transfer.receiver,
                amount: transfer.amount,
                fee: transfer.fee,
            });
        }

        self.ledger.check(&payments)?;
        if !writes.is_empty() {
            self.state.commit(writes)?;
        }
        if payments.is_empty() {
            return Ok(());
        }

        if let Err(e) = self.ledger.settle(&payments) {
            // Create never carries payments, so `current` is set here.
            if let Some(before) = current {
                if let Err(restore) = self.state.commit(encode_delta(&transition.record, before)) {
                    error!(error = %restore, "Failed to restore escrow status after settlement failure");
                }
            }
            warn!(error = %e, "Settlement failed");
            return Err(e.into());
        }
        debug!(payments = payments.len(), "Payments settled");
        Ok(())
    }
}

/// Resolve raw application arguments against the stored record.
///
/// Before creation, args are `[buyer, seller, amount]`: two 32-byte
/// addresses and a big-endian integer of at most 8 bytes. Afterwards,
/// `args[0]` names the operation.
pub fn resolve_args(
    current: Option<&EscrowRecord>,
    args: &[Vec<u8>],
) -> Result<Request, EscrowError> {
    if current.is_some() {
        let op = args.first().ok_or(EscrowError::MissingOperation)?;
        return Operation::from_arg(op).map(Request::from);
    }

    let [buyer, seller, amount, ..] = args else {
        return Err(EscrowError::InvalidArguments(format!(
            "create expects 3 arguments, got {}",
            args.len()
        )));
    };
    Ok(Request::Create(EscrowTerms {
        buyer: Address::from_slice(buyer)
            .ok_or_else(|| EscrowError::InvalidArguments("buyer must be 32 bytes".to_string()))?,
        seller: Address::from_slice(seller)
            .ok_or_else(|| EscrowError::InvalidArguments("seller must be 32 bytes".to_string()))?,
        amount: btoi(amount)?,
    }))
}

/// Big-endian bytes to integer. Empty input is zero.
pub fn btoi(bytes: &[u8]) -> Result<u64, EscrowError> {
    if bytes.len() > 8 {
        return Err(EscrowError::InvalidArguments(format!(
            "integer argument is {} bytes, max 8",
            bytes.len()
        )));
    }
    Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}

impl<S: GlobalState, L: Ledger, C: Clock> EscrowApi for EscrowService<S, L, C> {
    fn invoke(
        &self,
        caller: Address,
        args: &[Vec<u8>],
        companion: Option<CompanionTransfer>,
    ) -> Result<InvocationReceipt, EscrowError> {
        self.run(caller, companion, |current| resolve_args(current, args))
    }

    fn submit(
        &self,
        caller: Address,
        request: Request,
        companion: Option<CompanionTransfer>,
    ) -> Result<InvocationReceipt, EscrowError> {
        self.run(caller, companion, |_| Ok(request))
    }
}

/// Service wired to the in-memory adapters.
pub type InMemoryEscrowService = EscrowService<InMemoryGlobalState, InMemoryLedger, ManualClock>;

/// Build an in-memory service with a manual clock starting at `start_time`.
#[must_use]
pub fn create_in_memory_service(config: EscrowConfig, start_time: u64) -> InMemoryEscrowService {
    EscrowService::new(
        config,
        Arc::new(InMemoryGlobalState::new()),
        Arc::new(InMemoryLedger::new()),
        Arc::new(ManualClock::new(start_time)),
    )
}
