//! # Owner and Reader Flows
//!
//! Full write-then-resolve round trips through `IdentityOwner` and the
//! in-memory ledger, with fresh instances standing in for other processes.

#[cfg(test)]
mod tests {
    use crate::fixtures::{init_test_logging, owner_on, pem, test_owner, CO_OWNER, OWNER, READER};
    use tls_did_projector::{
        resolve_document, Attribute, IdentityDocumentApi, Identifier, InMemoryLedger,
        ProjectorConfig, RegistrationOutcome, SigningPolicy, TxOptions, WriteOperation,
    };

    // =============================================================================
    // REGISTER → WRITE → RELOAD
    // =============================================================================

    #[tokio::test]
    async fn test_register_add_attribute_fresh_load() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);

        let writer = test_owner(&ledger)?;
        assert_eq!(
            writer.register("example.org", TxOptions::default()).await?,
            RegistrationOutcome::JustRegistered
        );
        writer
            .add_attribute("parent/child", "value", TxOptions::default())
            .await?;

        let fresh = test_owner(&ledger)?;
        fresh.load("example.org").await?;

        let document = fresh.document().await;
        assert_eq!(
            document.attributes,
            vec![Attribute::new("parent/child", "value")]
        );
        assert!(fresh.is_registered().await);
        assert_eq!(fresh.did().await?, "did:tls:example.org");
        Ok(())
    }

    #[tokio::test]
    async fn test_attributes_accumulate_across_reload() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        let owner = test_owner(&ledger)?;
        owner.register("example.org", TxOptions::default()).await?;
        owner.add_attribute("p1", "v1", TxOptions::default()).await?;
        owner.add_attribute("p2", "v2", TxOptions::default()).await?;

        owner.reload().await?;
        let mut attributes = owner.document().await.attributes;
        attributes.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(
            attributes,
            vec![Attribute::new("p1", "v1"), Attribute::new("p2", "v2")]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_full_document_survives_reload() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        let (owner, public_key) = owner_on(&ledger, ProjectorConfig::for_testing())?;
        owner.register("example.org", TxOptions::default()).await?;
        owner.add_attribute("parent/child", "value", TxOptions::default()).await?;
        owner.set_expiry(1_700_000_000_000, TxOptions::default()).await?;
        owner
            .add_chain(vec![pem("LEAF"), pem("INTERMEDIATE")], TxOptions::default())
            .await?;
        owner.sign(TxOptions::default()).await?;

        let fresh = test_owner(&ledger)?;
        fresh.load("example.org").await?;

        assert_eq!(fresh.document().await, owner.document().await);
        fresh.verify(&public_key).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_keeps_domain_and_claim() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        let owner = test_owner(&ledger)?;
        owner.register("example.org", TxOptions::default()).await?;
        owner.add_attribute("a", "1", TxOptions::default()).await?;
        owner.set_expiry(9, TxOptions::default()).await?;
        owner.add_chain(vec![pem("LEAF")], TxOptions::default()).await?;
        owner.sign(TxOptions::default()).await?;

        owner.delete(TxOptions::default()).await?;

        let document = owner.document().await;
        assert!(document.attributes.is_empty());
        assert_eq!(document.expiry, None);
        assert_eq!(document.signature, None);
        assert!(document.chain.is_empty());
        assert_eq!(owner.identifier().await?.as_str(), "example.org");
        assert!(owner.is_registered().await);

        // A write after delete starts a new history
        owner.add_attribute("b", "2", TxOptions::default()).await?;
        owner.reload().await?;
        assert_eq!(owner.document().await.attributes, vec![Attribute::new("b", "2")]);
        Ok(())
    }

    // =============================================================================
    // SIGNING
    // =============================================================================

    #[tokio::test]
    async fn test_sign_on_write_keeps_document_verifiable() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        let config = ProjectorConfig {
            signing_policy: SigningPolicy::OnWrite,
            ..ProjectorConfig::for_testing()
        };
        let (owner, public_key) = owner_on(&ledger, config)?;
        owner.load("example.org").await?;

        owner.add_attribute("a", "1", TxOptions::default()).await?;
        owner.verify(&public_key).await?;
        owner.add_chain(vec![pem("LEAF")], TxOptions::default()).await?;
        owner.verify(&public_key).await?;

        let fresh = test_owner(&ledger)?;
        fresh.load("example.org").await?;
        fresh.verify(&public_key).await?;

        let signatures = ledger
            .transactions()
            .iter()
            .filter(|(_, tx)| tx.operation() == WriteOperation::SetSignature)
            .count();
        assert_eq!(signatures, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_returning_owner_signs_full_history() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        let writer = test_owner(&ledger)?;
        writer.register("example.org", TxOptions::default()).await?;
        writer.add_attribute("a", "1", TxOptions::default()).await?;

        let config = ProjectorConfig {
            signing_policy: SigningPolicy::OnWrite,
            ..ProjectorConfig::for_testing()
        };
        let (returning, public_key) = owner_on(&ledger, config)?;
        assert_eq!(
            returning.register("example.org", TxOptions::default()).await?,
            RegistrationOutcome::AlreadyRegistered
        );
        assert_eq!(
            returning.document().await.attributes,
            vec![Attribute::new("a", "1")]
        );

        returning.add_attribute("b", "2", TxOptions::default()).await?;

        let reader = test_owner(&ledger)?;
        reader.load("example.org").await?;
        assert_eq!(
            reader.document().await.attributes,
            vec![Attribute::new("b", "2"), Attribute::new("a", "1")]
        );
        reader.verify(&public_key).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_cleared_chain_stays_cleared() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        let config = ProjectorConfig {
            signing_policy: SigningPolicy::OnWrite,
            ..ProjectorConfig::for_testing()
        };
        let (owner, public_key) = owner_on(&ledger, config)?;
        owner.register("example.org", TxOptions::default()).await?;
        owner.add_chain(vec![pem("OLD")], TxOptions::default()).await?;
        owner.add_chain(Vec::new(), TxOptions::default()).await?;

        let live = owner.document().await;
        owner.reload().await?;
        assert!(live.chain.is_empty());
        assert_eq!(owner.document().await, live);
        owner.verify(&public_key).await?;
        Ok(())
    }

    // =============================================================================
    // MULTIPLE CLAIMANTS
    // =============================================================================

    #[tokio::test]
    async fn test_claimants_keep_separate_histories() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        let first = test_owner(&ledger)?;
        let second = test_owner(&ledger.connect(CO_OWNER))?;

        first.register("example.org", TxOptions::default()).await?;
        second.register("example.org", TxOptions::default()).await?;
        first.set_expiry(1, TxOptions::default()).await?;
        second.set_expiry(2, TxOptions::default()).await?;

        first.reload().await?;
        second.reload().await?;
        assert_eq!(first.document().await.expiry, Some(1));
        assert_eq!(second.document().await.expiry, Some(2));

        let id = Identifier::new("example.org")?;
        let config = ProjectorConfig::for_testing();
        let reader = ledger.connect(READER);
        let as_seen = resolve_document(&reader, &id, &CO_OWNER, &config).await?;
        assert!(as_seen.registered);
        assert_eq!(as_seen.projection.expiry, Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_writes_on_one_instance() -> anyhow::Result<()> {
        init_test_logging();
        let ledger = InMemoryLedger::new(OWNER);
        let owner = test_owner(&ledger)?;
        owner.register("example.org", TxOptions::default()).await?;

        let writes = (0..8).map(|i| {
            let owner = &owner;
            async move {
                owner
                    .add_attribute(&format!("path/{}", i), "v", TxOptions::default())
                    .await
            }
        });
        for result in futures::future::join_all(writes).await {
            result?;
        }

        let live = owner.document().await;
        owner.reload().await?;
        assert_eq!(owner.document().await, live);
        assert_eq!(live.attributes.len(), 8);
        Ok(())
    }
}
