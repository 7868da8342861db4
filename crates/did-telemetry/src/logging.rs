//! Subscriber installation.
//!
//! Human-readable output for development, JSON lines with consistent fields
//! (`timestamp`, `level`, `target`, `service`, message fields) for log
//! shippers.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Outcome of [`init_logging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingHandle {
    /// This call installed the global subscriber.
    Installed,
    /// A global subscriber already existed; it was left in place.
    AlreadyInstalled,
}

/// Install the global tracing subscriber.
///
/// Safe to call more than once: later calls report `AlreadyInstalled`
/// instead of failing, which lets every test binary call it freely.
pub fn init_logging(config: &TelemetryConfig) -> Result<LoggingHandle, TelemetryError> {
    let env_filter =
        EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError::InvalidFilter {
            directive: config.log_level.clone(),
            reason: e.to_string(),
        })?;

    let installed = if config.json_logs {
        let json_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .is_ok()
    } else {
        let fmt_layer = fmt::layer().with_target(true);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok()
    };

    if !installed {
        return Ok(LoggingHandle::AlreadyInstalled);
    }

    tracing::info!(
        service = %config.service_name,
        network = %config.network,
        json_logs = config.json_logs,
        "Logging initialized"
    );

    Ok(LoggingHandle::Installed)
}
