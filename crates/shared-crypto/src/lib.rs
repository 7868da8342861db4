//! # Shared Crypto - Document Signing Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 | Canonical content digests |
//! | `ecdsa` | secp256k1 | Detached signatures over document digests |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic, low-S normalization (EIP-2)
//! - **SHA-256**: length-prefixed framing, so field boundaries cannot shift
//!
//! Private key material never leaves `Secp256k1KeyPair`; the wrapped k256
//! `SigningKey` zeroizes itself on drop. Nothing in this crate persists keys.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;

// Re-exports
pub use ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};
pub use errors::CryptoError;
pub use hashing::{sha256, Digest, Sha256Hasher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
