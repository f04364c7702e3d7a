//! # Escrow Telemetry
//!
//! Logging bootstrap for escrow hosts and test harnesses.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use escrow_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ESCROW_SERVICE_NAME` | `escrow` | Service name in log lines |
//! | `ESCROW_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` wins) |
//! | `ESCROW_JSON_LOGS` | `false` | JSON output |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Log filter directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}
