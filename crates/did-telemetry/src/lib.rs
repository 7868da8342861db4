//! # DID Telemetry
//!
//! Logging setup shared by TLS-DID services and test suites.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use did_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `tls-did` | Service name attached to every event |
//! | `TLSDID_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `TLSDID_JSON_LOGS` | `false` | Emit JSON lines instead of human-readable output |
//! | `TLSDID_NETWORK` | `devnet` | Ledger network label |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingHandle};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// Directive as supplied
        directive: String,
        /// Parser message
        reason: String,
    },
}
