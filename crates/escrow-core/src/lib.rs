//! # Escrow Core
//!
//! Two-party escrow held in custody by an application account.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A buyer deposits a fixed amount into custody. The buyer then either
//! confirms, releasing the deposit to the seller, or requests a refund.
//! Once the deadline has passed anyone may trigger the refund, so funds
//! never stay locked.
//!
//! ## Lifecycle
//!
//! | From | Operation | To | Who |
//! |------|-----------|----|-----|
//! | (none) | create | `CREATED` | anyone |
//! | `CREATED` | fund | `FUNDED` | buyer, with exact payment |
//! | `FUNDED` | confirm | `COMPLETED` | buyer |
//! | `FUNDED` | refund | `REFUNDED` | buyer, or anyone after timeout |
//! | any | status | unchanged | anyone |
//!
//! Every outbound transfer pays `amount - fixed_fee` and carries a
//! `fixed_fee` fee, so custody ends at zero.
//!
//! ## Module Structure
//!
//! ```text
//! escrow-core/
//! ├── domain/          # EscrowRecord, state machine, payout, invariants
//! ├── ports/           # EscrowApi, GlobalState, Ledger, Clock
//! ├── adapters/        # In-memory store, ledger, clocks, state codec
//! ├── config.rs        # Fee and timeout policy
//! └── service.rs       # Atomic invocation driver
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{
    application_address, InMemoryGlobalState, InMemoryLedger, ManualClock, SystemClock,
    ESCROW_SCHEMA,
};
pub use config::{ConfigError, EscrowConfig, DEFAULT_TIMEOUT_OFFSET_SECS};
pub use domain::{
    payout, Address, CompanionDefect, CompanionTransfer, EscrowError, EscrowRecord,
    EscrowStateMachine, EscrowStatus, EscrowTerms, InvocationContext, LedgerError, Operation,
    Payout, Request, StoreError, TransferInstruction, Transition, TxnType, DEFAULT_FIXED_FEE,
};
pub use ports::{Clock, EscrowApi, GlobalState, InvocationReceipt, Ledger, Payment, StateValue};
pub use service::{
    create_in_memory_service, EscrowService, InMemoryEscrowService, ServiceStats,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        create_in_memory_service, Address, CompanionTransfer, EscrowApi, EscrowConfig,
        EscrowError, EscrowStatus, EscrowTerms, InvocationReceipt, Ledger,
    };
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
