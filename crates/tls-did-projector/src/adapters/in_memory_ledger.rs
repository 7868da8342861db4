//! In-memory ledger adapter.
//!
//! Implements `LedgerClient` over a shared, mutex-guarded chain state that
//! behaves like the registry contract: one block per transaction, a
//! claimant set per identifier, a change pointer per (account, identifier)
//! and an append-only event log whose entries point back at the previous
//! change.
//!
//! Clones made through [`InMemoryLedger::connect`] share the chain but send
//! as a different account.

use crate::domain::{
    Account, ChangeEvent, ChangeKind, DidError, EventFilter, Identifier, LedgerTransaction,
    Position, Receipt, TxHash, TxOptions, RECEIPT_STATUS_SUCCESS,
};
use crate::ports::LedgerClient;
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_crypto::Sha256Hasher;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Gas below which every transaction runs out of gas.
pub const INTRINSIC_GAS: u64 = 21_000;

const STATUS_REVERTED: u64 = 0;

#[derive(Default)]
struct LedgerState {
    block_number: u64,
    tx_counter: u64,
    claimants: HashMap<Identifier, Vec<Account>>,
    changed: HashMap<(Account, Identifier), Position>,
    events: Vec<ChangeEvent>,
    receipts: HashMap<TxHash, Receipt>,
    transactions: Vec<(Account, LedgerTransaction)>,
    forced_status: Option<u64>,
    confirmation_delay: Option<Duration>,
    event_queries: usize,
}

impl LedgerState {
    fn is_claimant(&self, identifier: &Identifier, account: &Account) -> bool {
        self.claimants
            .get(identifier)
            .is_some_and(|set| set.contains(account))
    }

    fn emit(&mut self, signer: Account, identifier: Identifier, change: ChangeKind) {
        let position = Position::new(self.block_number);
        let key = (signer, identifier);
        let previous_change = self.changed.get(&key).copied().unwrap_or(Position::NONE);
        let log_index = self.events.iter().filter(|e| e.position == position).count() as u32;

        self.events.push(ChangeEvent {
            identifier: key.1.clone(),
            account: signer,
            position,
            log_index,
            previous_change,
            change,
        });
        self.changed.insert(key, position);
    }

    /// Mine one block holding `transaction`; returns the receipt status.
    fn execute(
        &mut self,
        signer: Account,
        transaction: &LedgerTransaction,
        options: TxOptions,
    ) -> u64 {
        self.block_number += 1;

        if let Some(status) = self.forced_status {
            if status != RECEIPT_STATUS_SUCCESS {
                return status;
            }
        }
        if options.gas_limit.is_some_and(|limit| limit < INTRINSIC_GAS) {
            return STATUS_REVERTED;
        }

        let identifier = transaction.identifier().clone();
        let change = match transaction {
            LedgerTransaction::RegisterClaim { .. } => {
                let set = self.claimants.entry(identifier).or_default();
                if set.contains(&signer) {
                    return STATUS_REVERTED;
                }
                set.push(signer);
                return RECEIPT_STATUS_SUCCESS;
            }
            LedgerTransaction::RemoveChange { .. } => {
                self.changed.remove(&(signer, identifier));
                return RECEIPT_STATUS_SUCCESS;
            }
            LedgerTransaction::AddAttribute { path, value, .. } => ChangeKind::AttributeChanged {
                path: path.clone(),
                value: value.clone(),
            },
            LedgerTransaction::SetExpiry { expiry_ms, .. } => ChangeKind::ExpiryChanged {
                expiry: *expiry_ms,
            },
            LedgerTransaction::SetSignature { signature, .. } => ChangeKind::SignatureChanged {
                signature: signature.clone(),
            },
            LedgerTransaction::AddChain { chain, .. } => ChangeKind::ChainChanged {
                chain: chain.clone(),
            },
        };

        if !self.is_claimant(&identifier, &signer) {
            return STATUS_REVERTED;
        }
        self.emit(signer, identifier, change);
        RECEIPT_STATUS_SUCCESS
    }
}

/// Shared in-memory ledger.
#[derive(Clone)]
pub struct InMemoryLedger {
    state: Arc<Mutex<LedgerState>>,
    signer: Account,
}

impl InMemoryLedger {
    /// Fresh chain at block 0, sending as `signer`.
    pub fn new(signer: Account) -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState::default())),
            signer,
        }
    }

    /// Same chain, sending as `signer`.
    pub fn connect(&self, signer: Account) -> Self {
        Self {
            state: Arc::clone(&self.state),
            signer,
        }
    }

    /// Force every following receipt to `status` until cleared with `None`.
    pub fn force_receipt_status(&self, status: Option<u64>) {
        self.state.lock().forced_status = status;
    }

    /// Delay every confirmation wait by `delay`.
    pub fn set_confirmation_delay(&self, delay: Option<Duration>) {
        self.state.lock().confirmation_delay = delay;
    }

    /// Current block number.
    pub fn block_number(&self) -> u64 {
        self.state.lock().block_number
    }

    /// Every submitted transaction with its sender, in submission order.
    pub fn transactions(&self) -> Vec<(Account, LedgerTransaction)> {
        self.state.lock().transactions.clone()
    }

    /// Number of event queries served so far.
    pub fn event_queries(&self) -> usize {
        self.state.lock().event_queries
    }

    /// Append a raw event without any contract checks.
    ///
    /// Lets tests build malformed histories (cycles, dangling pointers).
    pub fn inject_event(&self, event: ChangeEvent) {
        let mut state = self.state.lock();
        state.block_number = state.block_number.max(event.position.value());
        state.events.push(event);
    }

    /// Overwrite a change pointer without any contract checks.
    pub fn set_change_pointer(&self, account: Account, identifier: Identifier, position: Position) {
        self.state.lock().changed.insert((account, identifier), position);
    }

    fn tx_hash(counter: u64, signer: &Account) -> TxHash {
        let mut hasher = Sha256Hasher::new();
        hasher.update_u64(counter).update(signer.as_bytes());
        TxHash(hasher.finalize())
    }
}

#[async_trait]
impl LedgerClient for InMemoryLedger {
    fn signer(&self) -> Account {
        self.signer
    }

    async fn claimant_count(&self, identifier: &Identifier) -> Result<u64, DidError> {
        let state = self.state.lock();
        Ok(state.claimants.get(identifier).map_or(0, |set| set.len() as u64))
    }

    async fn claimant(&self, identifier: &Identifier, index: u64) -> Result<Account, DidError> {
        let state = self.state.lock();
        state
            .claimants
            .get(identifier)
            .and_then(|set| usize::try_from(index).ok().and_then(|i| set.get(i)))
            .copied()
            .ok_or_else(|| {
                DidError::Ledger(format!("claimant index {} out of range for {}", index, identifier))
            })
    }

    async fn last_change_position(
        &self,
        account: &Account,
        identifier: &Identifier,
    ) -> Result<Position, DidError> {
        let state = self.state.lock();
        Ok(state
            .changed
            .get(&(*account, identifier.clone()))
            .copied()
            .unwrap_or(Position::NONE))
    }

    async fn query_events(&self, filter: &EventFilter) -> Result<Vec<ChangeEvent>, DidError> {
        let mut state = self.state.lock();
        state.event_queries += 1;
        Ok(state
            .events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn submit(
        &self,
        transaction: LedgerTransaction,
        options: TxOptions,
    ) -> Result<TxHash, DidError> {
        let mut state = self.state.lock();
        state.tx_counter += 1;
        let tx_hash = Self::tx_hash(state.tx_counter, &self.signer);

        let status = state.execute(self.signer, &transaction, options);
        let block = Position::new(state.block_number);
        debug!(
            "[tls-did] In-memory ledger mined {} in block {} (status {})",
            transaction.operation(),
            block,
            status
        );

        state.receipts.insert(
            tx_hash,
            Receipt {
                tx_hash,
                status,
                block,
            },
        );
        state.transactions.push((self.signer, transaction));
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<Receipt, DidError> {
        let (delay, receipt) = {
            let state = self.state.lock();
            (state.confirmation_delay, state.receipts.get(&tx_hash).copied())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        receipt.ok_or_else(|| DidError::Ledger(format!("unknown transaction {}", tx_hash)))
    }
}
