//! # Content Hash
//!
//! Canonical digest of an identity document. Field order is fixed and every
//! variable-length item is length-prefixed:
//!
//! ```text
//! tag "tls-did/v1" | domain | #attrs | (path | value)* | expiry? | #certs | cert*
//! ```
//!
//! Attributes are hashed in stored order. The chain is a single list of
//! certificates.

use crate::domain::{Attribute, DidError, DocumentProjection, Identifier};
use shared_crypto::{Digest, Secp256k1PublicKey, Secp256k1Signature, Sha256Hasher};

/// Domain-separation tag prefixed to every content hash.
pub const CONTENT_HASH_TAG: &[u8] = b"tls-did/v1";

/// `hash(domain, attributes, expiry, chain)`.
pub fn hash_document(
    identifier: &Identifier,
    attributes: &[Attribute],
    expiry: Option<u64>,
    chain: &[String],
) -> Digest {
    let mut hasher = Sha256Hasher::new();
    hasher.update_framed(CONTENT_HASH_TAG);
    hasher.update_framed(identifier.as_str().as_bytes());

    hasher.update_len(attributes.len());
    for attribute in attributes {
        hasher.update_framed(attribute.path.as_bytes());
        hasher.update_framed(attribute.value.as_bytes());
    }

    match expiry {
        Some(ms) => hasher.update(&[1]).update_u64(ms),
        None => hasher.update(&[0]),
    };

    hasher.update_len(chain.len());
    for cert in chain {
        hasher.update_framed(cert.as_bytes());
    }

    hasher.finalize()
}

/// Content hash of a projection. The signature field is not covered.
pub fn content_hash(identifier: &Identifier, projection: &DocumentProjection) -> Digest {
    hash_document(
        identifier,
        &projection.attributes,
        projection.expiry,
        &projection.chain,
    )
}

/// Check the projection's signature against its content hash.
///
/// # Errors
/// - `InvalidSignature` if no signature is stored or it does not verify
/// - `Crypto` if the stored signature is not in the hex wire form
pub fn verify_document(
    identifier: &Identifier,
    projection: &DocumentProjection,
    public_key: &Secp256k1PublicKey,
) -> Result<(), DidError> {
    let encoded = projection
        .signature
        .as_deref()
        .ok_or(DidError::InvalidSignature)?;
    let signature = Secp256k1Signature::from_hex(encoded)?;
    let digest = content_hash(identifier, projection);
    public_key
        .verify(&digest, &signature)
        .map_err(|_| DidError::InvalidSignature)
}
