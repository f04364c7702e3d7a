//! # Domain Layer (Inner Hexagon)
//!
//! Pure escrow logic. NO I/O, NO clock, NO storage.
//! Adapters depend on this layer, never the reverse.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod machine;
pub mod payout;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use machine::EscrowStateMachine;
pub use payout::{payout, Payout, DEFAULT_FIXED_FEE};
pub use value_objects::*;
