//! # Value Objects
//!
//! Immutable identifiers and ledger references.

use super::errors::DidError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// DID method prefix for TLS-anchored identifiers.
pub const DID_METHOD_PREFIX: &str = "did:tls:";

/// Receipt status the ledger reports for a confirmed, successful write.
pub const RECEIPT_STATUS_SUCCESS: u64 = 1;

/// Domain name anchoring an identity document. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Validate and wrap a domain.
    ///
    /// # Errors
    /// - `InvalidIdentifier` if `domain` is empty
    pub fn new(domain: impl Into<String>) -> Result<Self, DidError> {
        let domain = domain.into();
        if domain.is_empty() {
            return Err(DidError::InvalidIdentifier);
        }
        Ok(Self(domain))
    }

    /// The bare domain.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `did:tls:<domain>`.
    pub fn did(&self) -> String {
        format!("{}{}", DID_METHOD_PREFIX, self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = DidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ledger account (20-byte address).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Account(pub [u8; 20]);

impl Account {
    /// Wrap raw address bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Ledger position (block number) holding a change event.
///
/// Position `0` is the "no change recorded" sentinel and never holds events.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position(u64);

impl Position {
    /// The "no change recorded" sentinel.
    pub const NONE: Position = Position(0);

    /// Wrap a block number.
    pub const fn new(block: u64) -> Self {
        Self(block)
    }

    /// Raw block number.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// True for the sentinel.
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction hash returned on submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(pub [u8; 32]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Per-call transaction options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOptions {
    /// Resource ceiling for the transaction. `None` lets the ledger estimate.
    pub gas_limit: Option<u64>,
}

impl TxOptions {
    /// Options with an explicit gas limit.
    pub fn with_gas_limit(gas_limit: u64) -> Self {
        Self {
            gas_limit: Some(gas_limit),
        }
    }
}

/// Confirmation receipt for a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Transaction this receipt confirms.
    pub tx_hash: TxHash,
    /// `1` = success, anything else = failure.
    pub status: u64,
    /// Block the transaction was included in.
    pub block: Position,
}

impl Receipt {
    /// True when the ledger reports success.
    pub fn is_success(&self) -> bool {
        self.status == RECEIPT_STATUS_SUCCESS
    }
}

/// Mutating ledger operations, named for error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WriteOperation {
    /// Add the signer to the claimant set.
    RegisterClaim,
    /// Append an attribute.
    AddAttribute,
    /// Replace the expiry.
    SetExpiry,
    /// Replace the signature.
    SetSignature,
    /// Replace the certificate chain.
    AddChain,
    /// Reset the change pointer.
    RemoveChange,
}

impl WriteOperation {
    /// Kind-specific failure name.
    pub fn failure_kind(&self) -> &'static str {
        match self {
            WriteOperation::RegisterClaim => "RegistrationWriteFailed",
            WriteOperation::AddAttribute => "AttributeWriteFailed",
            WriteOperation::SetExpiry => "ExpiryWriteFailed",
            WriteOperation::SetSignature => "SignatureWriteFailed",
            WriteOperation::AddChain => "ChainWriteFailed",
            WriteOperation::RemoveChange => "DeleteWriteFailed",
        }
    }

    /// Whether the signer must be a claimant before this write.
    pub fn requires_registration(&self) -> bool {
        matches!(
            self,
            WriteOperation::AddAttribute
                | WriteOperation::SetExpiry
                | WriteOperation::SetSignature
                | WriteOperation::AddChain
        )
    }
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriteOperation::RegisterClaim => "registerClaim",
            WriteOperation::AddAttribute => "addAttribute",
            WriteOperation::SetExpiry => "setExpiry",
            WriteOperation::SetSignature => "setSignature",
            WriteOperation::AddChain => "addChain",
            WriteOperation::RemoveChange => "removeChange",
        };
        f.write_str(name)
    }
}

/// Result of the registration pre-step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationOutcome {
    /// The account was already a claimant; no transaction was sent.
    AlreadyRegistered,
    /// A `registerClaim` transaction was confirmed by this call.
    JustRegistered,
}
