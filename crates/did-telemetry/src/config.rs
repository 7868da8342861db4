//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to log events
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error, or full directives)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Ledger network label (devnet, testnet, mainnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "tls-did".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            network: "devnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTEL_SERVICE_NAME`: Service name (default: tls-did)
    /// - `TLSDID_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `TLSDID_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `TLSDID_NETWORK`: Network name (default: devnet)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();
        let defaults = Self::default();

        Self {
            service_name: lookup("OTEL_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("TLSDID_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: lookup("TLSDID_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),

            network: lookup("TLSDID_NETWORK").unwrap_or(defaults.network),
        }
    }

    /// Quiet configuration for test suites.
    pub fn for_testing() -> Self {
        Self {
            log_level: "warn".to_string(),
            ..Self::default()
        }
    }
}
