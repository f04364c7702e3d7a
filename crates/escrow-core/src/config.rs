//! Escrow policy configuration.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::domain::payout::DEFAULT_FIXED_FEE;

/// Seconds between creation and the refund deadline (24 hours).
pub const DEFAULT_TIMEOUT_OFFSET_SECS: u64 = 86_400;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Environment variable present but not a valid integer.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// Timeout offset of zero makes every escrow immediately refundable.
    #[error("timeout offset must be non-zero")]
    ZeroTimeout,

    /// Application id 0 is reserved for "not yet created".
    #[error("application id must be non-zero")]
    ZeroAppId,
}

/// Escrow fee and timeout policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscrowConfig {
    /// Offset added to the creation time to get the refund deadline.
    pub timeout_offset_secs: u64,
    /// Fee paid by custody on every outbound transfer.
    pub fixed_fee: u64,
    /// Application id; custody address is derived from it.
    pub app_id: u64,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            timeout_offset_secs: DEFAULT_TIMEOUT_OFFSET_SECS,
            fixed_fee: DEFAULT_FIXED_FEE,
            app_id: 1,
        }
    }
}

impl EscrowConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ESCROW_TIMEOUT_SECS`: refund deadline offset (default: 86400)
    /// - `ESCROW_FIXED_FEE`: outbound transfer fee (default: 1000)
    /// - `ESCROW_APP_ID`: application id (default: 1)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            timeout_offset_secs: read_u64("ESCROW_TIMEOUT_SECS", defaults.timeout_offset_secs)?,
            fixed_fee: read_u64("ESCROW_FIXED_FEE", defaults.fixed_fee)?,
            app_id: read_u64("ESCROW_APP_ID", defaults.app_id)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the state machine cannot run under.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_offset_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.app_id == 0 {
            return Err(ConfigError::ZeroAppId);
        }
        Ok(())
    }
}

fn read_u64(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(default),
    }
}
