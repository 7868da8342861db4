//! # Outbound Ports
//!
//! Traits for the external collaborators: the ledger client and the
//! document signer.

use crate::domain::{
    Account, ChangeEvent, DidError, EventFilter, Identifier, LedgerTransaction, Position, Receipt,
    TxHash, TxOptions,
};
use async_trait::async_trait;
use shared_crypto::Digest;

/// Ledger client - outbound port.
///
/// An already-authenticated connection: every transaction is sent as
/// [`LedgerClient::signer`].
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Account transactions are sent from.
    fn signer(&self) -> Account;

    /// `getClaimantCount(domain)`
    async fn claimant_count(&self, identifier: &Identifier) -> Result<u64, DidError>;

    /// `getClaimant(domain, index)`
    async fn claimant(&self, identifier: &Identifier, index: u64) -> Result<Account, DidError>;

    /// `getLastChangePosition(account, domain)`. `Position::NONE` when no
    /// change is recorded.
    async fn last_change_position(
        &self,
        account: &Account,
        identifier: &Identifier,
    ) -> Result<Position, DidError>;

    /// Decoded events matching `filter`.
    async fn query_events(&self, filter: &EventFilter) -> Result<Vec<ChangeEvent>, DidError>;

    /// Submit a mutating transaction. Returns once the ledger accepted it,
    /// not once it is confirmed.
    async fn submit(
        &self,
        transaction: LedgerTransaction,
        options: TxOptions,
    ) -> Result<TxHash, DidError>;

    /// Wait until `tx_hash` is confirmed and return its receipt.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Receipt, DidError>;
}

/// Document signer - outbound port.
///
/// Holds the private key; the projector only ever hands it digests.
pub trait DocumentSigner: Send + Sync {
    /// Detached signature over `digest`, in the ledger wire form.
    fn sign_digest(&self, digest: &Digest) -> Result<String, DidError>;
}
