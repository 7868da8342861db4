//! # Domain Invariants
//!
//! Rules every read and write path must uphold.

use super::errors::DidError;
use super::value_objects::{Identifier, Position, Receipt, WriteOperation};
use std::collections::HashSet;

/// Default ceiling on positions visited by one walk.
pub const DEFAULT_MAX_WALK_DEPTH: usize = 10_000;

/// Default bound on a confirmation wait, in milliseconds.
pub const DEFAULT_CONFIRMATION_TIMEOUT_MS: u64 = 120_000;

/// Default bound on a single ledger read, in milliseconds.
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 30_000;

/// Invariant: writes and reloads require a bound identifier.
pub fn invariant_identifier_bound(
    identifier: Option<&Identifier>,
) -> Result<&Identifier, DidError> {
    identifier.ok_or(DidError::InvalidIdentifier)
}

/// Invariant: only status `1` counts as a committed write.
pub fn invariant_receipt_success(
    receipt: &Receipt,
    operation: WriteOperation,
) -> Result<(), DidError> {
    if receipt.is_success() {
        Ok(())
    } else {
        Err(DidError::WriteFailed { operation })
    }
}

/// Invariant: a walk never revisits a position and never exceeds its depth
/// ceiling.
///
/// Records `next` as visited when it passes.
pub fn invariant_walk_step(
    visited: &mut HashSet<Position>,
    next: Position,
    max_depth: usize,
) -> Result<(), DidError> {
    if visited.contains(&next) {
        return Err(DidError::ChainCycle { position: next });
    }
    if visited.len() >= max_depth {
        return Err(DidError::WalkDepthExceeded { limit: max_depth });
    }
    visited.insert(next);
    Ok(())
}
