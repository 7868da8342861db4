//! # SHA-256 Hashing
//!
//! Canonical digests for identity documents.
//!
//! Variable-length inputs are framed with a big-endian `u32` length prefix so
//! that `("ab", "c")` and `("a", "bc")` never collide.

use sha2::Sha256;

/// SHA-256 output (256-bit).
pub type Digest = [u8; 32];

/// Stateful SHA-256 hasher with framing helpers.
#[derive(Clone, Default)]
pub struct Sha256Hasher {
    inner: Sha256,
}

impl Sha256Hasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update with raw data (no framing).
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        sha2::Digest::update(&mut self.inner, data);
        self
    }

    /// Update with a length-prefixed byte string.
    pub fn update_framed(&mut self, data: &[u8]) -> &mut Self {
        self.update_len(data.len());
        self.update(data)
    }

    /// Update with a length or count as big-endian `u32`.
    ///
    /// Lengths above `u32::MAX` saturate; no document field gets near that.
    pub fn update_len(&mut self, len: usize) -> &mut Self {
        let len = u32::try_from(len).unwrap_or(u32::MAX);
        self.update(&len.to_be_bytes())
    }

    /// Update with a big-endian `u64`.
    pub fn update_u64(&mut self, value: u64) -> &mut Self {
        self.update(&value.to_be_bytes())
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> Digest {
        sha2::Digest::finalize(self.inner).into()
    }
}

/// Hash data with SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> Digest {
    let mut hasher = Sha256Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
