//! # Domain Entities
//!
//! Change events as the ledger stores them, the filters used to query them,
//! and the document projection rebuilt from them.

use super::value_objects::{Account, Identifier, Position, WriteOperation};
use serde::{Deserialize, Serialize};

/// A single `(path, value)` pair of the identity document.
///
/// Paths use the `parent/child` or `parent[]/child` form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute path.
    pub path: String,
    /// Value stored at the path.
    pub value: String,
}

impl Attribute {
    /// Create an attribute.
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

/// The four change-event kinds, in the order they are queried and merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    /// `AttributeChanged`
    Attribute,
    /// `ExpiryChanged`
    Expiry,
    /// `SignatureChanged`
    Signature,
    /// `ChainChanged`
    Chain,
}

impl EventKind {
    /// Every kind, in query order.
    pub const ALL: [EventKind; 4] = [
        EventKind::Attribute,
        EventKind::Expiry,
        EventKind::Signature,
        EventKind::Chain,
    ];

    /// Ledger event name.
    pub fn event_name(&self) -> &'static str {
        match self {
            EventKind::Attribute => "AttributeChanged",
            EventKind::Expiry => "ExpiryChanged",
            EventKind::Signature => "SignatureChanged",
            EventKind::Chain => "ChainChanged",
        }
    }
}

/// Kind-specific payload of a change event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// An attribute was appended.
    AttributeChanged {
        /// Attribute path.
        path: String,
        /// Attribute value.
        value: String,
    },
    /// The expiry was replaced.
    ExpiryChanged {
        /// Expiry as unix milliseconds.
        expiry: u64,
    },
    /// The signature was replaced.
    SignatureChanged {
        /// Hex-encoded signature.
        signature: String,
    },
    /// The certificate chain was replaced.
    ChainChanged {
        /// Concatenated PEM blob.
        chain: String,
    },
}

impl ChangeKind {
    /// Discriminant.
    pub fn kind(&self) -> EventKind {
        match self {
            ChangeKind::AttributeChanged { .. } => EventKind::Attribute,
            ChangeKind::ExpiryChanged { .. } => EventKind::Expiry,
            ChangeKind::SignatureChanged { .. } => EventKind::Signature,
            ChangeKind::ChainChanged { .. } => EventKind::Chain,
        }
    }
}

/// A decoded change event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Identifier the change applies to.
    pub identifier: Identifier,
    /// Account that made the change.
    pub account: Account,
    /// Ledger position the event was emitted at.
    pub position: Position,
    /// Index of the log within its position.
    pub log_index: u32,
    /// Position of the prior change for the same (identifier, account).
    pub previous_change: Position,
    /// Payload.
    pub change: ChangeKind,
}

impl ChangeEvent {
    /// Discriminant of the payload.
    pub fn kind(&self) -> EventKind {
        self.change.kind()
    }
}

/// Query scoping events to one kind, one (identifier, account), one position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Event kind.
    pub kind: EventKind,
    /// Emitting account.
    pub account: Account,
    /// Identifier.
    pub identifier: Identifier,
    /// Position to search.
    pub position: Position,
}

impl EventFilter {
    /// True when `event` satisfies every criterion of the filter.
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        event.kind() == self.kind
            && event.account == self.account
            && event.identifier == self.identifier
            && event.position == self.position
    }
}

/// A mutating transaction as submitted to the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerTransaction {
    /// `registerClaim(domain)`
    RegisterClaim {
        /// Identifier to claim.
        identifier: Identifier,
    },
    /// `addAttribute(domain, path, value)`
    AddAttribute {
        /// Target identifier.
        identifier: Identifier,
        /// Attribute path.
        path: String,
        /// Attribute value.
        value: String,
    },
    /// `setExpiry(domain, timestampMillis)`
    SetExpiry {
        /// Target identifier.
        identifier: Identifier,
        /// Expiry as unix milliseconds.
        expiry_ms: u64,
    },
    /// `setSignature(domain, signature)`
    SetSignature {
        /// Target identifier.
        identifier: Identifier,
        /// Hex-encoded signature.
        signature: String,
    },
    /// `addChain(domain, concatenatedPemBlob)`
    AddChain {
        /// Target identifier.
        identifier: Identifier,
        /// Concatenated PEM blob.
        chain: String,
    },
    /// `removeChange(domain)`
    RemoveChange {
        /// Target identifier.
        identifier: Identifier,
    },
}

impl LedgerTransaction {
    /// Operation name for error reporting.
    pub fn operation(&self) -> WriteOperation {
        match self {
            LedgerTransaction::RegisterClaim { .. } => WriteOperation::RegisterClaim,
            LedgerTransaction::AddAttribute { .. } => WriteOperation::AddAttribute,
            LedgerTransaction::SetExpiry { .. } => WriteOperation::SetExpiry,
            LedgerTransaction::SetSignature { .. } => WriteOperation::SetSignature,
            LedgerTransaction::AddChain { .. } => WriteOperation::AddChain,
            LedgerTransaction::RemoveChange { .. } => WriteOperation::RemoveChange,
        }
    }

    /// Identifier the transaction targets.
    pub fn identifier(&self) -> &Identifier {
        match self {
            LedgerTransaction::RegisterClaim { identifier }
            | LedgerTransaction::AddAttribute { identifier, .. }
            | LedgerTransaction::SetExpiry { identifier, .. }
            | LedgerTransaction::SetSignature { identifier, .. }
            | LedgerTransaction::AddChain { identifier, .. }
            | LedgerTransaction::RemoveChange { identifier } => identifier,
        }
    }
}

/// Reconstructed identity document.
///
/// Attributes are newest-first: the order a backward walk discovers them,
/// and the order local writes maintain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentProjection {
    /// Every attribute write, duplicates included.
    pub attributes: Vec<Attribute>,
    /// Expiry as unix milliseconds.
    pub expiry: Option<u64>,
    /// Hex-encoded signature over the content hash.
    pub signature: Option<String>,
    /// Certificate chain, leaf first. Empty when unset.
    pub chain: Vec<String>,
}

impl DocumentProjection {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
            && self.expiry.is_none()
            && self.signature.is_none()
            && self.chain.is_empty()
    }

    /// Reset every field.
    pub fn clear(&mut self) {
        self.attributes.clear();
        self.expiry = None;
        self.signature = None;
        self.chain.clear();
    }
}
