//! # State Reducer
//!
//! Folds change-event batches into a [`DocumentProjection`].
//!
//! The walk runs newest to oldest, and fields merge asymmetrically:
//!
//! | Field | Policy | Effect |
//! |-------|--------|--------|
//! | attributes | `Accumulate` | every write appended, duplicates kept |
//! | expiry | `KeepFirst` | first (most recent) value wins |
//! | signature | `KeepFirst` | first (most recent) value wins |
//! | chain | `KeepFirst` | first (most recent) blob wins, split into certs, even when empty |
//!
//! Attributes therefore carry the full write history while the scalars hold
//! only the current value. Resolvers depend on exactly this shape.

use super::cert_chain::split_chain;
use crate::domain::{Attribute, ChangeEvent, ChangeKind, DocumentProjection, EventKind};
use std::collections::HashSet;
use tracing::debug;

/// Merge strategy for one field kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergePolicy {
    /// Append every event.
    Accumulate,
    /// Set only while the field is still unset.
    KeepFirst,
}

/// What a merge did to the projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Value appended to a list field.
    Appended,
    /// Scalar field set.
    Set,
    /// Field already held a more recent value.
    Ignored,
}

impl MergePolicy {
    /// Policy for `kind`.
    pub fn for_kind(kind: EventKind) -> Self {
        match kind {
            EventKind::Attribute => MergePolicy::Accumulate,
            EventKind::Expiry | EventKind::Signature | EventKind::Chain => MergePolicy::KeepFirst,
        }
    }

    /// Merge `change` into `projection` under this policy.
    ///
    /// `settled` records the kinds already written in this walk; `KeepFirst`
    /// consults it instead of the field contents, so an empty value that was
    /// written still wins over older ones.
    pub fn apply(
        self,
        projection: &mut DocumentProjection,
        settled: &mut HashSet<EventKind>,
        change: &ChangeKind,
    ) -> MergeOutcome {
        match self {
            MergePolicy::Accumulate => accumulate(projection, change),
            MergePolicy::KeepFirst => keep_first(projection, settled, change),
        }
    }
}

fn accumulate(projection: &mut DocumentProjection, change: &ChangeKind) -> MergeOutcome {
    match change {
        ChangeKind::AttributeChanged { path, value } => {
            projection.attributes.push(Attribute::new(path.clone(), value.clone()));
            MergeOutcome::Appended
        }
        // Scalars never accumulate
        _ => replace(projection, change),
    }
}

fn keep_first(
    projection: &mut DocumentProjection,
    settled: &mut HashSet<EventKind>,
    change: &ChangeKind,
) -> MergeOutcome {
    // Settled means written once, even with an empty value
    if !settled.insert(change.kind()) {
        return MergeOutcome::Ignored;
    }
    replace(projection, change)
}

fn replace(projection: &mut DocumentProjection, change: &ChangeKind) -> MergeOutcome {
    match change {
        ChangeKind::ExpiryChanged { expiry } => projection.expiry = Some(*expiry),
        ChangeKind::SignatureChanged { signature } => {
            projection.signature = Some(signature.clone())
        }
        ChangeKind::ChainChanged { chain } => projection.chain = split_chain(chain),
        ChangeKind::AttributeChanged { .. } => return accumulate(projection, change),
    }
    MergeOutcome::Set
}

/// Stateful reducer for one walk.
#[derive(Debug, Default)]
pub struct DocumentReducer {
    projection: DocumentProjection,
    settled: HashSet<EventKind>,
    applied: usize,
    ignored: usize,
}

impl DocumentReducer {
    /// Reducer over an empty projection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one event.
    pub fn apply(&mut self, event: &ChangeEvent) -> MergeOutcome {
        let outcome = MergePolicy::for_kind(event.kind()).apply(
            &mut self.projection,
            &mut self.settled,
            &event.change,
        );
        match outcome {
            MergeOutcome::Ignored => {
                self.ignored += 1;
                debug!(
                    "[tls-did] Ignoring older {} at position {}",
                    event.kind().event_name(),
                    event.position
                );
            }
            MergeOutcome::Appended | MergeOutcome::Set => self.applied += 1,
        }
        outcome
    }

    /// Merge a batch in the order given (newest first).
    pub fn apply_batch(&mut self, batch: &[ChangeEvent]) {
        for event in batch {
            self.apply(event);
        }
    }

    /// Projection built so far.
    pub fn projection(&self) -> &DocumentProjection {
        &self.projection
    }

    /// Events that changed the projection.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Events superseded by a more recent value.
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    /// Finish the walk.
    pub fn into_projection(self) -> DocumentProjection {
        self.projection
    }
}
