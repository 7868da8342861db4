//! # Identity Owner Service
//!
//! Write-commit pipeline for one identity document:
//!
//! ```text
//! validate ─► registration pre-step ─► submit ─► await receipt ─► status == 1?
//!                                                                   │ yes
//!                                              local update ◄───────┘
//!                                                   │
//!                                       re-sign (SigningPolicy::OnWrite)
//! ```
//!
//! Every mutating call holds the instance lock from validation to the
//! final local update, so a write and its re-sign are never interleaved
//! with another write on the same instance.

use async_trait::async_trait;
use shared_crypto::Secp256k1PublicKey;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::resolver::resolve_document;
use crate::algorithms::{content_hash, join_chain, resolve_ownership, verify_document, with_deadline};
use crate::config::{ProjectorConfig, SigningPolicy};
use crate::domain::{
    invariant_identifier_bound, invariant_receipt_success, Account, Attribute, DidError,
    DocumentProjection, Identifier, LedgerTransaction, Receipt, RegistrationOutcome, TxOptions,
    WriteOperation,
};
use crate::ports::{DocumentSigner, IdentityDocumentApi, LedgerClient};

/// Mutable state guarded by the instance lock.
#[derive(Debug, Default)]
struct OwnerState {
    identifier: Option<Identifier>,
    registered: bool,
    projection: DocumentProjection,
}

/// Identity owner - maintains one document on the ledger.
pub struct IdentityOwner<L: LedgerClient> {
    /// Ledger connection, authenticated as `account`.
    ledger: Arc<L>,
    /// Signs content hashes.
    signer: Arc<dyn DocumentSigner>,
    /// Configuration.
    config: ProjectorConfig,
    /// Account writes are sent from.
    account: Account,
    /// Bound identifier, registration flag and projection.
    state: Mutex<OwnerState>,
}

impl<L: LedgerClient> IdentityOwner<L> {
    /// Create an unbound owner with an empty document.
    pub fn new(ledger: Arc<L>, signer: Arc<dyn DocumentSigner>, config: ProjectorConfig) -> Self {
        let account = ledger.signer();
        Self {
            ledger,
            signer,
            config,
            account,
            state: Mutex::new(OwnerState::default()),
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// Submit, await confirmation within the configured bound, check status.
    async fn commit(
        &self,
        transaction: LedgerTransaction,
        options: TxOptions,
    ) -> Result<Receipt, DidError> {
        let operation = transaction.operation();
        let identifier = transaction.identifier().clone();
        let options = self.config.effective_options(options);

        let tx_hash = with_deadline(
            self.config.query_timeout(),
            "submit",
            self.ledger.submit(transaction, options),
        )
        .await?;

        let receipt = tokio::time::timeout(
            self.config.confirmation_timeout(),
            self.ledger.wait_for_receipt(tx_hash),
        )
        .await
        .map_err(|_| DidError::ConfirmationTimeout {
            operation,
            timeout_ms: self.config.confirmation_timeout_ms,
        })??;

        if let Err(e) = invariant_receipt_success(&receipt, operation) {
            warn!(
                "[tls-did] {} for {} failed in block {} (status {})",
                operation, identifier, receipt.block, receipt.status
            );
            return Err(e);
        }

        info!(
            identifier = %identifier,
            block = %receipt.block,
            tx = %receipt.tx_hash,
            "[tls-did] {} confirmed",
            operation
        );
        Ok(receipt)
    }

    /// Registration pre-step. Sends `registerClaim` only when the ledger
    /// does not already list the account.
    async fn ensure_registered(
        &self,
        state: &mut OwnerState,
        identifier: &Identifier,
        options: TxOptions,
    ) -> Result<RegistrationOutcome, DidError> {
        if state.registered {
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

        let listed = resolve_ownership(
            self.ledger.as_ref(),
            identifier,
            &self.account,
            self.config.query_timeout(),
        )
        .await?;
        if listed {
            state.registered = true;
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }

        self.commit(
            LedgerTransaction::RegisterClaim {
                identifier: identifier.clone(),
            },
            options,
        )
        .await?;
        state.registered = true;
        Ok(RegistrationOutcome::JustRegistered)
    }

    /// Validate the binding and run the registration pre-step when
    /// `operation` needs it.
    async fn prepare_write(
        &self,
        state: &mut OwnerState,
        operation: WriteOperation,
        options: TxOptions,
    ) -> Result<Identifier, DidError> {
        let identifier = invariant_identifier_bound(state.identifier.as_ref())?.clone();

        if operation.requires_registration() && !state.registered {
            let outcome = self.ensure_registered(state, &identifier, options).await?;
            if outcome == RegistrationOutcome::JustRegistered {
                info!(
                    "[tls-did] Registered {} as claimant of {} before {}",
                    self.account, identifier, operation
                );
            }
        }
        Ok(identifier)
    }

    /// Hash the current projection, sign it, commit the signature.
    async fn sign_locked(
        &self,
        state: &mut OwnerState,
        identifier: &Identifier,
        options: TxOptions,
    ) -> Result<(), DidError> {
        let digest = content_hash(identifier, &state.projection);
        let signature = self.signer.sign_digest(&digest)?;

        self.commit(
            LedgerTransaction::SetSignature {
                identifier: identifier.clone(),
                signature: signature.clone(),
            },
            options,
        )
        .await?;
        state.projection.signature = Some(signature);
        Ok(())
    }

    async fn resign_if_configured(
        &self,
        state: &mut OwnerState,
        identifier: &Identifier,
        options: TxOptions,
    ) -> Result<(), DidError> {
        match self.config.signing_policy {
            SigningPolicy::OnWrite => self.sign_locked(state, identifier, options).await,
            SigningPolicy::Explicit => Ok(()),
        }
    }

    /// Replace the whole state with a fresh resolve. Leaves the state
    /// untouched on error.
    async fn rebuild(&self, state: &mut OwnerState, identifier: Identifier) -> Result<(), DidError> {
        let resolved =
            resolve_document(self.ledger.as_ref(), &identifier, &self.account, &self.config)
                .await?;
        state.identifier = Some(identifier);
        state.registered = resolved.registered;
        state.projection = resolved.projection;
        Ok(())
    }
}

#[async_trait]
impl<L: LedgerClient + 'static> IdentityDocumentApi for IdentityOwner<L> {
    async fn load(&self, domain: &str) -> Result<(), DidError> {
        let identifier = Identifier::new(domain)?;
        let mut state = self.state.lock().await;
        self.rebuild(&mut state, identifier).await
    }

    async fn reload(&self) -> Result<(), DidError> {
        let mut state = self.state.lock().await;
        let identifier = state.identifier.clone().ok_or(DidError::NotLinked)?;
        self.rebuild(&mut state, identifier).await
    }

    async fn register(
        &self,
        domain: &str,
        options: TxOptions,
    ) -> Result<RegistrationOutcome, DidError> {
        let identifier = Identifier::new(domain)?;
        let mut state = self.state.lock().await;

        if state.identifier.as_ref() != Some(&identifier) {
            // Rebinding: pick up any history the account already has
            self.rebuild(&mut state, identifier.clone()).await?;
        }
        self.ensure_registered(&mut state, &identifier, options).await
    }

    async fn add_attribute(
        &self,
        path: &str,
        value: &str,
        options: TxOptions,
    ) -> Result<(), DidError> {
        let mut state = self.state.lock().await;
        let identifier = self
            .prepare_write(&mut state, WriteOperation::AddAttribute, options)
            .await?;

        self.commit(
            LedgerTransaction::AddAttribute {
                identifier: identifier.clone(),
                path: path.to_string(),
                value: value.to_string(),
            },
            options,
        )
        .await?;

        // Newest first, matching replay order
        state.projection.attributes.insert(0, Attribute::new(path, value));
        self.resign_if_configured(&mut state, &identifier, options).await
    }

    async fn set_expiry(&self, expiry_ms: u64, options: TxOptions) -> Result<(), DidError> {
        let mut state = self.state.lock().await;
        let identifier = self
            .prepare_write(&mut state, WriteOperation::SetExpiry, options)
            .await?;

        self.commit(
            LedgerTransaction::SetExpiry {
                identifier: identifier.clone(),
                expiry_ms,
            },
            options,
        )
        .await?;

        state.projection.expiry = Some(expiry_ms);
        self.resign_if_configured(&mut state, &identifier, options).await
    }

    async fn add_chain(&self, certs: Vec<String>, options: TxOptions) -> Result<(), DidError> {
        let mut state = self.state.lock().await;
        let identifier = self
            .prepare_write(&mut state, WriteOperation::AddChain, options)
            .await?;

        self.commit(
            LedgerTransaction::AddChain {
                identifier: identifier.clone(),
                chain: join_chain(&certs),
            },
            options,
        )
        .await?;

        state.projection.chain = certs;
        self.resign_if_configured(&mut state, &identifier, options).await
    }

    async fn sign(&self, options: TxOptions) -> Result<(), DidError> {
        let mut state = self.state.lock().await;
        let identifier = self
            .prepare_write(&mut state, WriteOperation::SetSignature, options)
            .await?;
        self.sign_locked(&mut state, &identifier, options).await
    }

    async fn delete(&self, options: TxOptions) -> Result<(), DidError> {
        let mut state = self.state.lock().await;
        let identifier = self
            .prepare_write(&mut state, WriteOperation::RemoveChange, options)
            .await?;

        self.commit(
            LedgerTransaction::RemoveChange {
                identifier: identifier.clone(),
            },
            options,
        )
        .await?;

        state.projection.clear();
        info!("[tls-did] Change history of {} cleared", identifier);
        Ok(())
    }

    async fn verify(&self, public_key: &Secp256k1PublicKey) -> Result<(), DidError> {
        let state = self.state.lock().await;
        let identifier = state.identifier.as_ref().ok_or(DidError::NotLinked)?;
        verify_document(identifier, &state.projection, public_key)
    }

    async fn document(&self) -> DocumentProjection {
        self.state.lock().await.projection.clone()
    }

    async fn is_registered(&self) -> bool {
        self.state.lock().await.registered
    }

    async fn identifier(&self) -> Result<Identifier, DidError> {
        self.state
            .lock()
            .await
            .identifier
            .clone()
            .ok_or(DidError::NotLinked)
    }

    async fn did(&self) -> Result<String, DidError> {
        Ok(self.identifier().await?.did())
    }

    fn account(&self) -> Account {
        self.account
    }
}
