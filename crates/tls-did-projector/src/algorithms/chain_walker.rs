//! # Event Chain Walker
//!
//! Backward traversal of the per-(identifier, account) change log.
//!
//! ```text
//! change pointer ──► position P3 ──previousChange──► P2 ──► P1 ──► 0 (stop)
//!                     [batch]                        [batch] [batch]
//! ```
//!
//! The four event kinds at one position are queried concurrently; positions
//! are visited strictly one after another, since a position's back-pointer
//! is only known once its events are read.

use super::deadline::with_deadline;
use super::reducer::DocumentReducer;
use crate::domain::{
    invariant_walk_step, Account, ChangeEvent, DidError, EventFilter, EventKind, Identifier,
    Position, DEFAULT_MAX_WALK_DEPTH, DEFAULT_QUERY_TIMEOUT_MS,
};
use crate::ports::LedgerClient;
use futures::future::join_all;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounds on a single walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WalkLimits {
    /// Maximum positions visited.
    pub max_depth: usize,
    /// Bound on each event query.
    pub query_timeout: Duration,
}

impl Default for WalkLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_WALK_DEPTH,
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
        }
    }
}

/// What a walk touched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Positions visited, newest first.
    pub positions: Vec<Position>,
    /// Events handed to the reducer.
    pub events: usize,
}

/// Order a batch newest first.
///
/// Within one position, a later event's back-pointer is never smaller than
/// an earlier one's, so descending `previous_change` (then `log_index`) puts
/// the newest event first and the true predecessor last.
pub fn order_batch(batch: &mut [ChangeEvent]) {
    batch.sort_by(|a, b| {
        b.previous_change
            .cmp(&a.previous_change)
            .then(b.log_index.cmp(&a.log_index))
    });
}

/// Query every event kind at `position` concurrently and join the results.
///
/// Events the ledger returns that do not satisfy the filter are dropped.
pub async fn fetch_position_batch<L: LedgerClient + ?Sized>(
    ledger: &L,
    identifier: &Identifier,
    account: &Account,
    position: Position,
    query_timeout: Duration,
) -> Result<Vec<ChangeEvent>, DidError> {
    let queries = EventKind::ALL.into_iter().map(|kind| {
        let filter = EventFilter {
            kind,
            account: *account,
            identifier: identifier.clone(),
            position,
        };
        async move {
            let events =
                with_deadline(query_timeout, "query_events", ledger.query_events(&filter)).await?;
            let total = events.len();
            let matching: Vec<ChangeEvent> =
                events.into_iter().filter(|e| filter.matches(e)).collect();
            if matching.len() != total {
                warn!(
                    "[tls-did] Dropped {} stray {} events at position {}",
                    total - matching.len(),
                    kind.event_name(),
                    position
                );
            }
            Ok::<_, DidError>(matching)
        }
    });

    let mut batch = Vec::new();
    for result in join_all(queries).await {
        batch.extend(result?);
    }
    order_batch(&mut batch);
    Ok(batch)
}

/// Walk back from `start`, feeding each position's batch to `reducer`.
///
/// `Position::NONE` as `start` means no history: nothing is queried.
///
/// # Errors
/// - `BrokenChainLink` if a promised position holds no events
/// - `ChainCycle` if a back-pointer revisits a position
/// - `WalkDepthExceeded` past `limits.max_depth` positions
/// - `QueryTimeout` / `Ledger` from the ledger client
pub async fn walk_change_chain<L: LedgerClient + ?Sized>(
    ledger: &L,
    identifier: &Identifier,
    account: &Account,
    start: Position,
    limits: &WalkLimits,
    reducer: &mut DocumentReducer,
) -> Result<WalkSummary, DidError> {
    let mut summary = WalkSummary::default();
    if start.is_none() {
        debug!("[tls-did] No recorded changes for {} by {}", identifier, account);
        return Ok(summary);
    }

    let mut visited = HashSet::new();
    invariant_walk_step(&mut visited, start, limits.max_depth)?;
    let mut current = start;

    loop {
        let batch =
            fetch_position_batch(ledger, identifier, account, current, limits.query_timeout)
                .await?;

        let Some(oldest) = batch.last() else {
            return Err(DidError::BrokenChainLink { position: current });
        };
        let previous = oldest.previous_change;

        debug!(
            "[tls-did] Position {}: {} events, previous change at {}",
            current,
            batch.len(),
            previous
        );

        reducer.apply_batch(&batch);
        summary.positions.push(current);
        summary.events += batch.len();

        if previous.is_none() {
            break;
        }
        invariant_walk_step(&mut visited, previous, limits.max_depth)?;
        current = previous;
    }

    Ok(summary)
}
