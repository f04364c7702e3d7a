//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the escrow and its host.
//!
//! - **Driving Port (Inbound)**: `EscrowApi`
//! - **Driven Ports (Outbound)**: `GlobalState`, `Ledger`, `Clock`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
