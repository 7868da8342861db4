//! # Ownership Resolver
//!
//! An account is a claimant of an identifier iff it appears in the claimant
//! set the ledger enumerates for that identifier. Every call is a fresh
//! ledger read; nothing is cached.

use super::deadline::with_deadline;
use crate::domain::{Account, DidError, Identifier};
use crate::ports::LedgerClient;
use futures::future::try_join_all;
use std::time::Duration;
use tracing::debug;

/// Enumerate the claimant set, in ledger order.
///
/// Index reads fan out concurrently once the count is known.
pub async fn claimant_set<L: LedgerClient + ?Sized>(
    ledger: &L,
    identifier: &Identifier,
    query_timeout: Duration,
) -> Result<Vec<Account>, DidError> {
    let count = with_deadline(
        query_timeout,
        "claimant_count",
        ledger.claimant_count(identifier),
    )
    .await?;

    let reads = (0..count).map(|index| {
        with_deadline(query_timeout, "claimant", ledger.claimant(identifier, index))
    });
    try_join_all(reads).await
}

/// True iff `account` is a registered claimant of `identifier`.
pub async fn resolve_ownership<L: LedgerClient + ?Sized>(
    ledger: &L,
    identifier: &Identifier,
    account: &Account,
    query_timeout: Duration,
) -> Result<bool, DidError> {
    let claimants = claimant_set(ledger, identifier, query_timeout).await?;
    let registered = claimants.contains(account);
    debug!(
        "[tls-did] {} is {}a claimant of {} ({} claimants)",
        account,
        if registered { "" } else { "not " },
        identifier,
        claimants.len()
    );
    Ok(registered)
}
