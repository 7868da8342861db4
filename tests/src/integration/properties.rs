//! # Replay and Ownership Properties
//!
//! Property tests over arbitrary write histories. Each case builds its own
//! ledger and runtime.

#[cfg(test)]
mod tests {
    use crate::fixtures::{init_test_logging, pem, test_owner, OWNER};
    use proptest::prelude::*;
    use tls_did_projector::{
        claimant_set, join_chain, resolve_document, resolve_ownership, split_chain, Account,
        IdentityDocumentApi, Identifier, InMemoryLedger, LedgerClient, LedgerTransaction,
        ProjectorConfig, TxOptions,
    };

    #[derive(Clone, Debug)]
    enum Write {
        Attribute(String, String),
        Expiry(u64),
        Chain(Vec<String>),
    }

    fn write_strategy() -> impl Strategy<Value = Write> {
        prop_oneof![
            ("[a-z]{1,6}(/[a-z]{1,6})?", "[a-z0-9]{0,8}")
                .prop_map(|(path, value)| Write::Attribute(path, value)),
            any::<u64>().prop_map(Write::Expiry),
            prop::collection::vec("[A-Za-z0-9]{4,16}", 0..4)
                .prop_map(|bodies| Write::Chain(bodies.iter().map(|b| pem(b)).collect())),
        ]
    }

    async fn apply_all(writes: &[Write]) -> anyhow::Result<InMemoryLedger> {
        let ledger = InMemoryLedger::new(OWNER);
        let owner = test_owner(&ledger)?;
        owner.register("example.org", TxOptions::default()).await?;
        for write in writes {
            match write {
                Write::Attribute(path, value) => {
                    owner.add_attribute(path, value, TxOptions::default()).await?
                }
                Write::Expiry(expiry) => owner.set_expiry(*expiry, TxOptions::default()).await?,
                Write::Chain(certs) => owner.add_chain(certs.clone(), TxOptions::default()).await?,
            }
        }
        Ok(ledger)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_ownership_iff_listed(registers in prop::collection::vec(any::<bool>(), 1..6)) {
            tokio_test::block_on(async {
                let ledger = InMemoryLedger::new(OWNER);
                let id = Identifier::new("example.org").unwrap();
                let accounts: Vec<Account> = (0..registers.len())
                    .map(|i| Account::from_bytes([i as u8 + 1; 20]))
                    .collect();

                for (account, joins) in accounts.iter().zip(&registers) {
                    if *joins {
                        let client = ledger.connect(*account);
                        let hash = client
                            .submit(
                                LedgerTransaction::RegisterClaim { identifier: id.clone() },
                                TxOptions::default(),
                            )
                            .await
                            .unwrap();
                        client.wait_for_receipt(hash).await.unwrap();
                    }
                }

                let timeout = ProjectorConfig::for_testing().query_timeout();
                let listed = claimant_set(&ledger, &id, timeout).await.unwrap();
                for account in &accounts {
                    let owns = resolve_ownership(&ledger, &id, account, timeout).await.unwrap();
                    prop_assert_eq!(owns, listed.contains(account));
                }
                Ok(())
            })?;
        }

        #[test]
        fn prop_replay_is_deterministic(writes in prop::collection::vec(write_strategy(), 0..12)) {
            init_test_logging();
            tokio_test::block_on(async {
                let ledger = apply_all(&writes).await.unwrap();
                let id = Identifier::new("example.org").unwrap();
                let config = ProjectorConfig::for_testing();

                let first = resolve_document(&ledger, &id, &OWNER, &config).await.unwrap();
                let second = resolve_document(&ledger, &id, &OWNER, &config).await.unwrap();
                prop_assert_eq!(&first.projection, &second.projection);
                prop_assert_eq!(first.walk, second.walk);
                Ok(())
            })?;
        }

        #[test]
        fn prop_reload_matches_live_projection(writes in prop::collection::vec(write_strategy(), 0..12)) {
            tokio_test::block_on(async {
                let ledger = InMemoryLedger::new(OWNER);
                let owner = test_owner(&ledger).unwrap();
                owner.register("example.org", TxOptions::default()).await.unwrap();
                for write in &writes {
                    let result = match write {
                        Write::Attribute(p, v) => owner.add_attribute(p, v, TxOptions::default()).await,
                        Write::Expiry(e) => owner.set_expiry(*e, TxOptions::default()).await,
                        Write::Chain(c) => owner.add_chain(c.clone(), TxOptions::default()).await,
                    };
                    result.unwrap();
                }

                let live = owner.document().await;
                owner.reload().await.unwrap();
                prop_assert_eq!(owner.document().await, live);
                Ok(())
            })?;
        }

        #[test]
        fn prop_latest_scalar_wins(expiries in prop::collection::vec(any::<u64>(), 1..8)) {
            tokio_test::block_on(async {
                let writes: Vec<Write> = expiries.iter().copied().map(Write::Expiry).collect();
                let ledger = apply_all(&writes).await.unwrap();
                let id = Identifier::new("example.org").unwrap();

                let resolved = resolve_document(&ledger, &id, &OWNER, &ProjectorConfig::for_testing())
                    .await
                    .unwrap();
                prop_assert_eq!(resolved.projection.expiry, expiries.last().copied());
                prop_assert_eq!(resolved.walk.positions.len(), expiries.len());
                Ok(())
            })?;
        }

        #[test]
        fn prop_pem_chain_round_trip(bodies in prop::collection::vec("[A-Za-z0-9+/=\n]{1,40}", 1..5)) {
            let certs: Vec<String> = bodies.iter().map(|b| pem(b)).collect();
            prop_assert_eq!(split_chain(&join_chain(&certs)), certs);
        }
    }

    #[test]
    fn test_two_cert_round_trip() {
        let certs = vec![pem("CERT_A"), pem("CERT_B")];
        assert_eq!(split_chain(&join_chain(&certs)), certs);
    }
}
