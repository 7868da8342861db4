//! # Failure Paths
//!
//! Rejected and unconfirmed writes, slow ledgers and malformed change
//! histories. Local state must come out of every failure unchanged.

#[cfg(test)]
mod tests {
    use crate::fixtures::{init_test_logging, owner_on, test_owner, OWNER};
    use async_trait::async_trait;
    use shared_crypto::Secp256k1KeyPair;
    use std::sync::Arc;
    use std::time::Duration;
    use tls_did_projector::{
        Account, ChangeEvent, ChangeKind, DidError, EventFilter, IdentityDocumentApi,
        IdentityOwner, Identifier, InMemoryLedger, KeyPairSigner, LedgerClient,
        LedgerTransaction, Position, ProjectorConfig, Receipt, TxHash, TxOptions, WriteOperation,
        INTRINSIC_GAS,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Ledger whose event queries stall for `delay`.
    struct StallingLedger {
        inner: InMemoryLedger,
        delay: Duration,
    }

    #[async_trait]
    impl LedgerClient for StallingLedger {
        fn signer(&self) -> Account {
            self.inner.signer()
        }

        async fn claimant_count(&self, identifier: &Identifier) -> Result<u64, DidError> {
            self.inner.claimant_count(identifier).await
        }

        async fn claimant(&self, identifier: &Identifier, index: u64) -> Result<Account, DidError> {
            self.inner.claimant(identifier, index).await
        }

        async fn last_change_position(
            &self,
            account: &Account,
            identifier: &Identifier,
        ) -> Result<Position, DidError> {
            self.inner.last_change_position(account, identifier).await
        }

        async fn query_events(&self, filter: &EventFilter) -> Result<Vec<ChangeEvent>, DidError> {
            tokio::time::sleep(self.delay).await;
            self.inner.query_events(filter).await
        }

        async fn submit(
            &self,
            transaction: LedgerTransaction,
            options: TxOptions,
        ) -> Result<TxHash, DidError> {
            self.inner.submit(transaction, options).await
        }

        async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Receipt, DidError> {
            self.inner.wait_for_receipt(tx_hash).await
        }
    }

    fn raw_event(position: u64, previous: u64, expiry: u64) -> ChangeEvent {
        ChangeEvent {
            identifier: Identifier::new("example.org").unwrap(),
            account: OWNER,
            position: Position::new(position),
            log_index: 0,
            previous_change: Position::new(previous),
            change: ChangeKind::ExpiryChanged { expiry },
        }
    }

    // =============================================================================
    // REJECTED WRITES
    // =============================================================================

    #[tokio::test]
    async fn test_status_zero_leaves_attributes() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        let owner = test_owner(&ledger)?;
        owner.register("example.org", TxOptions::default()).await?;
        owner.add_attribute("kept", "1", TxOptions::default()).await?;
        let before = owner.document().await;

        ledger.force_receipt_status(Some(0));
        let err = owner
            .add_attribute("parent/child", "value", TxOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DidError::WriteFailed {
                operation: WriteOperation::AddAttribute
            }
        ));
        assert_eq!(err.to_string(), "AttributeWriteFailed: addAttribute unsuccessful");
        assert_eq!(owner.document().await, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_implicit_registration_aborts_write() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        let owner = test_owner(&ledger)?;
        owner.load("example.org").await?;

        ledger.force_receipt_status(Some(0));
        let err = owner.set_expiry(5, TxOptions::default()).await.unwrap_err();

        assert!(matches!(
            err,
            DidError::WriteFailed {
                operation: WriteOperation::RegisterClaim
            }
        ));
        assert!(!owner.is_registered().await);
        assert_eq!(ledger.transactions().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_gas_is_write_failure() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        let config = ProjectorConfig {
            default_gas_limit: Some(INTRINSIC_GAS - 1),
            ..ProjectorConfig::for_testing()
        };
        let (owner, _) = owner_on(&ledger, config)?;

        let err = owner
            .register("example.org", TxOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DidError::WriteFailed { .. }));

        // Caller-supplied limit overrides the default
        owner
            .register("example.org", TxOptions::with_gas_limit(INTRINSIC_GAS))
            .await?;
        assert!(owner.is_registered().await);
        Ok(())
    }

    // =============================================================================
    // TIMEOUTS
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_unconfirmed_write_times_out() -> anyhow::Result<()> {
        let ledger = InMemoryLedger::new(OWNER);
        let owner = test_owner(&ledger)?;
        owner.register("example.org", TxOptions::default()).await?;

        ledger.set_confirmation_delay(Some(Duration::from_secs(600)));
        let err = owner.set_expiry(5, TxOptions::default()).await.unwrap_err();

        assert!(matches!(
            err,
            DidError::ConfirmationTimeout {
                operation: WriteOperation::SetExpiry,
                ..
            }
        ));
        assert_eq!(owner.document().await.expiry, None);

        // Once confirmations flow again the mined write shows up on reload
        ledger.set_confirmation_delay(None);
        owner.reload().await?;
        assert_eq!(owner.document().await.expiry, Some(5));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_event_query_times_out() -> anyhow::Result<()> {
        let inner = InMemoryLedger::new(OWNER);
        let writer = test_owner(&inner)?;
        writer.register("example.org", TxOptions::default()).await?;
        writer.set_expiry(5, TxOptions::default()).await?;

        let stalling = StallingLedger {
            inner: inner.clone(),
            delay: Duration::from_secs(60),
        };
        let signer = KeyPairSigner::new(Secp256k1KeyPair::generate());
        let reader = IdentityOwner::new(
            Arc::new(stalling),
            Arc::new(signer),
            ProjectorConfig::for_testing(),
        );

        let err = reader.load("example.org").await.unwrap_err();
        assert!(matches!(
            err,
            DidError::QueryTimeout {
                query: "query_events",
                timeout_ms: 1_000
            }
        ));
        assert!(matches!(reader.identifier().await, Err(DidError::NotLinked)));
        Ok(())
    }

    // =============================================================================
    // MALFORMED HISTORIES
    // =============================================================================

    #[tokio::test]
    async fn test_dangling_pointer_fails_load() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        ledger.inject_event(raw_event(3, 7, 1));
        ledger.set_change_pointer(OWNER, Identifier::new("example.org")?, Position::new(3));

        let owner = test_owner(&ledger)?;
        let err = owner.load("example.org").await.unwrap_err();
        assert!(matches!(
            err,
            DidError::BrokenChainLink { position } if position == Position::new(7)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_cyclic_history_terminates() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        ledger.inject_event(raw_event(4, 2, 1));
        ledger.inject_event(raw_event(2, 4, 2));
        ledger.set_change_pointer(OWNER, Identifier::new("example.org")?, Position::new(4));

        let owner = test_owner(&ledger)?;
        let err = owner.load("example.org").await.unwrap_err();
        assert!(matches!(
            err,
            DidError::ChainCycle { position } if position == Position::new(4)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_projection() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        let owner = test_owner(&ledger)?;
        owner.register("example.org", TxOptions::default()).await?;
        owner.set_expiry(11, TxOptions::default()).await?;

        ledger.set_change_pointer(OWNER, Identifier::new("example.org")?, Position::new(99));
        assert!(owner.reload().await.is_err());
        assert_eq!(owner.document().await.expiry, Some(11));
        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_key_does_not_verify() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        let owner = test_owner(&ledger)?;
        owner.register("example.org", TxOptions::default()).await?;
        owner.add_attribute("a", "1", TxOptions::default()).await?;
        owner.sign(TxOptions::default()).await?;

        let stranger = Secp256k1KeyPair::generate().public_key();
        assert!(matches!(
            owner.verify(&stranger).await,
            Err(DidError::InvalidSignature)
        ));
        Ok(())
    }
}
