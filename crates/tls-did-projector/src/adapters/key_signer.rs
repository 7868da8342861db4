//! Key-pair signer adapter.
//!
//! Implements `DocumentSigner` with a secp256k1 key held in memory.

use crate::domain::DidError;
use crate::ports::DocumentSigner;
use shared_crypto::{Digest, Secp256k1KeyPair, Secp256k1PublicKey};

/// Signs document digests with an in-memory secp256k1 key.
pub struct KeyPairSigner {
    keypair: Secp256k1KeyPair,
}

impl KeyPairSigner {
    /// Wrap an existing key pair.
    pub fn new(keypair: Secp256k1KeyPair) -> Self {
        Self { keypair }
    }

    /// Load from raw secret key bytes.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Result<Self, DidError> {
        Ok(Self::new(Secp256k1KeyPair::from_bytes(bytes)?))
    }

    /// Public half, for verification.
    pub fn public_key(&self) -> Secp256k1PublicKey {
        self.keypair.public_key()
    }
}

impl DocumentSigner for KeyPairSigner {
    fn sign_digest(&self, digest: &Digest) -> Result<String, DidError> {
        Ok(self.keypair.sign(digest).to_hex())
    }
}
