//! # Document Resolver
//!
//! Read path open to any reader: ownership check, then a full walk from the
//! change pointer of (identifier, account). Nothing is reused between
//! calls.

use crate::algorithms::{resolve_ownership, walk_change_chain, with_deadline, DocumentReducer, WalkSummary};
use crate::config::ProjectorConfig;
use crate::domain::{Account, DidError, DocumentProjection, Identifier};
use crate::ports::LedgerClient;
use tracing::info;

/// A document rebuilt from the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedDocument {
    /// Identifier resolved.
    pub identifier: Identifier,
    /// Account whose change log was replayed.
    pub account: Account,
    /// Whether the account is in the claimant set.
    pub registered: bool,
    /// Rebuilt projection.
    pub projection: DocumentProjection,
    /// Positions visited.
    pub walk: WalkSummary,
}

/// Rebuild the document `account` maintains for `identifier`.
pub async fn resolve_document<L: LedgerClient + ?Sized>(
    ledger: &L,
    identifier: &Identifier,
    account: &Account,
    config: &ProjectorConfig,
) -> Result<ResolvedDocument, DidError> {
    let registered =
        resolve_ownership(ledger, identifier, account, config.query_timeout()).await?;

    let start = with_deadline(
        config.query_timeout(),
        "last_change_position",
        ledger.last_change_position(account, identifier),
    )
    .await?;

    let mut reducer = DocumentReducer::new();
    let walk = walk_change_chain(
        ledger,
        identifier,
        account,
        start,
        &config.walk_limits(),
        &mut reducer,
    )
    .await?;

    info!(
        identifier = %identifier,
        account = %account,
        registered,
        positions = walk.positions.len(),
        events = walk.events,
        superseded = reducer.ignored(),
        "[tls-did] Document resolved"
    );

    Ok(ResolvedDocument {
        identifier: identifier.clone(),
        account: *account,
        registered,
        projection: reducer.into_projection(),
        walk,
    })
}
