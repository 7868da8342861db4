//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound port traits.

mod in_memory_ledger;
mod key_signer;

pub use in_memory_ledger::{InMemoryLedger, INTRINSIC_GAS};
pub use key_signer::KeyPairSigner;
