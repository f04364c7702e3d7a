//! # Adapters Layer (Outer Hexagon)
//!
//! In-memory host implementations of the driven ports, plus the codec that
//! maps the escrow record onto global-state keys.

pub mod clock;
pub mod custody;
pub mod ledger;
pub mod memory_store;
pub mod state_codec;

pub use clock::{ManualClock, SystemClock};
pub use custody::application_address;
pub use ledger::InMemoryLedger;
pub use memory_store::InMemoryGlobalState;
pub use state_codec::{decode_record, encode_delta, encode_record, GlobalStateSchema, ESCROW_SCHEMA};
