//! # Projector Configuration
//!
//! Timeouts, walk bounds, gas defaults and the signing policy.

use crate::algorithms::WalkLimits;
use crate::domain::{
    TxOptions, DEFAULT_CONFIRMATION_TIMEOUT_MS, DEFAULT_MAX_WALK_DEPTH, DEFAULT_QUERY_TIMEOUT_MS,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// When the document gets re-signed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningPolicy {
    /// Only when the caller invokes `sign`.
    #[default]
    Explicit,
    /// After every attribute, expiry and chain write, inside the same
    /// exclusive scope.
    OnWrite,
}

/// Projector configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectorConfig {
    /// Bound on each confirmation wait, in milliseconds.
    pub confirmation_timeout_ms: u64,

    /// Bound on each ledger read and submission, in milliseconds.
    pub query_timeout_ms: u64,

    /// Gas limit used when the caller supplies none.
    pub default_gas_limit: Option<u64>,

    /// Maximum positions one walk may visit.
    pub max_walk_depth: usize,

    /// Re-signing policy.
    pub signing_policy: SigningPolicy,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            confirmation_timeout_ms: DEFAULT_CONFIRMATION_TIMEOUT_MS,
            query_timeout_ms: DEFAULT_QUERY_TIMEOUT_MS,
            default_gas_limit: None,
            max_walk_depth: DEFAULT_MAX_WALK_DEPTH,
            signing_policy: SigningPolicy::Explicit,
        }
    }
}

impl ProjectorConfig {
    /// Create a config for testing (short timeouts, shallow walks).
    pub fn for_testing() -> Self {
        Self {
            confirmation_timeout_ms: 2_000,
            query_timeout_ms: 1_000,
            default_gas_limit: None,
            max_walk_depth: 256,
            signing_policy: SigningPolicy::Explicit,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TLSDID_CONFIRMATION_TIMEOUT_MS` (default: 120000)
    /// - `TLSDID_QUERY_TIMEOUT_MS` (default: 30000)
    /// - `TLSDID_GAS_LIMIT` (default: unset)
    /// - `TLSDID_MAX_WALK_DEPTH` (default: 10000)
    /// - `TLSDID_SIGN_ON_WRITE` (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values fall back to
    /// the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            confirmation_timeout_ms: lookup("TLSDID_CONFIRMATION_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.confirmation_timeout_ms),
            query_timeout_ms: lookup("TLSDID_QUERY_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.query_timeout_ms),
            default_gas_limit: lookup("TLSDID_GAS_LIMIT").and_then(|v| v.parse().ok()),
            max_walk_depth: lookup("TLSDID_MAX_WALK_DEPTH")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_walk_depth),
            signing_policy: match lookup("TLSDID_SIGN_ON_WRITE") {
                Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => SigningPolicy::OnWrite,
                _ => SigningPolicy::Explicit,
            },
        }
    }

    /// Confirmation wait bound.
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }

    /// Read bound.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Walk bounds derived from this config.
    pub fn walk_limits(&self) -> WalkLimits {
        WalkLimits {
            max_depth: self.max_walk_depth,
            query_timeout: self.query_timeout(),
        }
    }

    /// Caller options with the default gas limit filled in.
    pub fn effective_options(&self, options: TxOptions) -> TxOptions {
        TxOptions {
            gas_limit: options.gas_limit.or(self.default_gas_limit),
        }
    }
}
