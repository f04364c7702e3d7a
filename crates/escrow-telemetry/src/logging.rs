//! Structured logging setup.
//!
//! JSON output carries consistent fields for log aggregation:
//! - `timestamp`, `level`, `target`
//! - `service`: from `TelemetryConfig::service_name`
//! - span fields such as `correlation_id`

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `config.log_level`. Fails with
/// [`TelemetryError::AlreadyInitialized`] if a subscriber is already set,
/// so callers that may race (tests) can ignore that variant.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Filter(e.to_string()))?;

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}

/// Log an escrow lifecycle event with the standard fields.
///
/// ```rust,ignore
/// log_escrow_event!(info, "Escrow request committed", "confirm", status, fee = 1_000u64);
/// ```
#[macro_export]
macro_rules! log_escrow_event {
    ($level:ident, $msg:expr, $operation:expr, $status:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = "escrow",
            operation = $operation,
            status = %$status,
            $($($field)*,)?
            $msg
        )
    };
}
