//! # Algorithms Module
//!
//! Ownership resolution, change-chain traversal, projection merge,
//! certificate chain framing and the canonical content hash.

pub mod cert_chain;
pub mod chain_walker;
pub mod content_hash;
pub mod deadline;
pub mod ownership;
pub mod reducer;

pub use cert_chain::{join_chain, split_chain, CERT_BEGIN_MARKER};
pub use chain_walker::{fetch_position_batch, order_batch, walk_change_chain, WalkLimits, WalkSummary};
pub use content_hash::{content_hash, hash_document, verify_document, CONTENT_HASH_TAG};
pub use deadline::with_deadline;
pub use ownership::{claimant_set, resolve_ownership};
pub use reducer::{DocumentReducer, MergeOutcome, MergePolicy};
