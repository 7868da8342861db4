//! # TLS-DID State Projector
//!
//! Client-side state of `did:tls` identity documents kept on a ledger
//! registry.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A document is never stored whole. Each claimant account writes a
//! backward-linked log of change events for an identifier; the projector
//! replays that log into a document and commits new changes through a
//! confirm-then-apply write pipeline.
//!
//! ## Guarantees
//!
//! | Property | Mechanism |
//! |----------|-----------|
//! | Ownership | Claimant set enumerated fresh on every check |
//! | Deterministic replay | Batches ordered newest first, merged by policy per field |
//! | Terminating walks | Visited-position guard plus depth ceiling |
//! | Confirm before apply | Local state changes only after a status-1 receipt |
//! | Serialized writes | One async lock per instance spans write and re-sign |
//!
//! ## Module Structure
//!
//! ```text
//! tls-did-projector/
//! ├── domain/          # Identifier, ChangeEvent, DocumentProjection, errors
//! ├── algorithms/      # Ownership, chain walk, reducer, cert chains, content hash
//! ├── ports/           # API trait (inbound) + ledger/signer traits (outbound)
//! ├── application/     # IdentityOwner write pipeline, document resolver
//! ├── adapters/        # In-memory ledger, key-pair signer
//! └── config.rs        # ProjectorConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{InMemoryLedger, KeyPairSigner, INTRINSIC_GAS};
pub use algorithms::{
    claimant_set, content_hash, join_chain, resolve_ownership, split_chain, verify_document,
    walk_change_chain, DocumentReducer, MergePolicy, WalkLimits, WalkSummary,
    CERT_BEGIN_MARKER, CONTENT_HASH_TAG,
};
pub use application::{resolve_document, IdentityOwner, ResolvedDocument};
pub use config::{ProjectorConfig, SigningPolicy};
pub use domain::{
    Account, Attribute, ChangeEvent, ChangeKind, DidError, DocumentProjection, EventFilter,
    EventKind, Identifier, LedgerTransaction, Position, Receipt, RegistrationOutcome, TxHash,
    TxOptions, WriteOperation, DID_METHOD_PREFIX, RECEIPT_STATUS_SUCCESS,
};
pub use ports::{DocumentSigner, IdentityDocumentApi, LedgerClient};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
