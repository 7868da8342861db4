//! # Inbound Ports
//!
//! API trait defining what an identity owner can do.

use crate::domain::{
    Account, DidError, DocumentProjection, Identifier, RegistrationOutcome, TxOptions,
};
use async_trait::async_trait;
use shared_crypto::Secp256k1PublicKey;

/// Identity document API - inbound port.
///
/// Every mutating call confirms on the ledger before touching local state.
/// Calls on one instance are serialized internally.
#[async_trait]
pub trait IdentityDocumentApi: Send + Sync {
    /// Bind to `domain` and rebuild the document from the ledger.
    async fn load(&self, domain: &str) -> Result<(), DidError>;

    /// Rebuild the document for the bound identifier, discarding local state.
    async fn reload(&self) -> Result<(), DidError>;

    /// Bind to `domain` and make the signer a claimant if it is not one.
    ///
    /// Binding to a new identifier first rebuilds the document from the
    /// ledger, the same way `load` does.
    async fn register(
        &self,
        domain: &str,
        options: TxOptions,
    ) -> Result<RegistrationOutcome, DidError>;

    /// Append an attribute.
    async fn add_attribute(
        &self,
        path: &str,
        value: &str,
        options: TxOptions,
    ) -> Result<(), DidError>;

    /// Replace the expiry (unix milliseconds).
    async fn set_expiry(&self, expiry_ms: u64, options: TxOptions) -> Result<(), DidError>;

    /// Replace the certificate chain. Do not include the root certificate.
    async fn add_chain(&self, certs: Vec<String>, options: TxOptions) -> Result<(), DidError>;

    /// Sign the current document and commit the signature.
    async fn sign(&self, options: TxOptions) -> Result<(), DidError>;

    /// Forget the change history. Claimant membership is kept.
    async fn delete(&self, options: TxOptions) -> Result<(), DidError>;

    /// Check the stored signature against the current document.
    async fn verify(&self, public_key: &Secp256k1PublicKey) -> Result<(), DidError>;

    /// Snapshot of the current document.
    async fn document(&self) -> DocumentProjection;

    /// Whether the signer is known to be a claimant.
    async fn is_registered(&self) -> bool;

    /// Bound identifier.
    async fn identifier(&self) -> Result<Identifier, DidError>;

    /// `did:tls:<domain>` for the bound identifier.
    async fn did(&self) -> Result<String, DidError>;

    /// Account the instance writes as.
    fn account(&self) -> Account;
}
