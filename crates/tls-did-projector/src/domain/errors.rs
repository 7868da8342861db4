//! # Domain Errors
//!
//! Error types for ownership resolution, change-log replay and the write
//! pipeline.

use super::value_objects::{Position, WriteOperation};
use shared_crypto::CryptoError;
use thiserror::Error;

/// Projector error types.
#[derive(Debug, Error)]
pub enum DidError {
    /// Empty domain supplied, or a write attempted on an instance with no
    /// bound identifier.
    #[error("Invalid identifier: no domain provided")]
    InvalidIdentifier,

    /// A change pointer promised events at a position that yielded none.
    #[error("Broken chain link: no change events at position {position}")]
    BrokenChainLink {
        /// Position that was expected to hold events
        position: Position,
    },

    /// A back-pointer led to a position already visited in this walk.
    #[error("Change chain cycle detected at position {position}")]
    ChainCycle {
        /// Position visited twice
        position: Position,
    },

    /// The walk visited more positions than the configured ceiling.
    #[error("Change chain deeper than {limit} positions")]
    WalkDepthExceeded {
        /// Configured ceiling
        limit: usize,
    },

    /// Confirmation status was not success. Local state is untouched.
    #[error("{}: {operation} unsuccessful", .operation.failure_kind())]
    WriteFailed {
        /// Write that failed
        operation: WriteOperation,
    },

    /// Accessor used before any identifier was associated with the instance.
    #[error("No linked identifier available")]
    NotLinked,

    /// Receipt did not arrive within the confirmation timeout.
    #[error("Confirmation of {operation} timed out after {timeout_ms}ms")]
    ConfirmationTimeout {
        /// Write awaiting confirmation
        operation: WriteOperation,
        /// Configured timeout
        timeout_ms: u64,
    },

    /// A ledger read did not complete within the query timeout.
    #[error("Ledger query '{query}' timed out after {timeout_ms}ms")]
    QueryTimeout {
        /// Query label
        query: &'static str,
        /// Configured timeout
        timeout_ms: u64,
    },

    /// Transport or protocol failure reported by the ledger client.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// The document carries no signature, or it does not cover the content.
    #[error("Document signature missing or invalid")]
    InvalidSignature,

    /// Underlying cryptographic failure.
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
