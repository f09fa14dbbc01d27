//! Simulated ledger node.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use poe_protocol::call::{encode_signing_payload, SigningPayload};
use poe_protocol::{AccountId, BlockHash, ClaimRecord, Digest, TxStatus, POE_MODULE, PROOFS_QUERY};
use sha2::{Digest as _, Sha256};
use tokio::sync::mpsc;

use crate::account;
use crate::client::{ChainClient, ChainError, ClaimWatch, SignedExtrinsic, SubscriptionHandle, TxProgress};

use super::pallet::{DispatchError, PoeEvent, Proofs};

/// Configuration of a [`SimLedger`].
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Delay between accepting an extrinsic and sealing its block.
    pub block_time: Duration,
    /// Shortest accepted claim key in bytes. `0` disables the check.
    pub min_claim_len: u32,
    /// Whether the proof-of-existence module is installed.
    pub poe_module: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            block_time: Duration::ZERO,
            min_claim_len: 0,
            poe_module: true,
        }
    }
}

/// A claim watcher registered by `subscribe_claim`.
struct Watcher {
    key: Vec<u8>,
    tx: mpsc::UnboundedSender<Option<ClaimRecord>>,
}

struct LedgerState {
    proofs: Proofs,
    best_number: u32,
    best_hash: BlockHash,
    /// Next nonce per account, counting extrinsics accepted but not yet sealed.
    pool_nonces: HashMap<AccountId, u64>,
    watchers: HashMap<u64, Watcher>,
    next_watch_id: u64,
    events: Vec<PoeEvent>,
}

struct LedgerInner {
    config: LedgerConfig,
    genesis: [u8; 32],
    state: Mutex<LedgerState>,
}

impl LedgerInner {
    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seal one block containing `extrinsic` and notify watchers of the
    /// touched claim.
    fn seal(&self, extrinsic: &SignedExtrinsic) -> (BlockHash, Result<PoeEvent, DispatchError>) {
        let mut state = self.state();
        let number = state.best_number + 1;

        let result = if self.config.poe_module {
            state.proofs.dispatch(extrinsic.signer, number, &extrinsic.call)
        } else {
            Err(DispatchError::UnknownCall {
                module: extrinsic.call.module.clone(),
                function: extrinsic.call.function.clone(),
            })
        };

        let hash: [u8; 32] = Sha256::new()
            .chain_update(state.best_hash.0)
            .chain_update(number.to_le_bytes())
            .chain_update(extrinsic.signer.0)
            .chain_update(extrinsic.nonce.to_le_bytes())
            .finalize()
            .into();
        let hash = BlockHash(hash);
        state.best_number = number;
        state.best_hash = hash;

        match &result {
            Ok(event) => {
                tracing::info!(
                    block = number,
                    %hash,
                    signer = %extrinsic.signer,
                    function = %extrinsic.call.function,
                    "block sealed"
                );
                let value = state.proofs.get(event.claim());
                let key = event.claim().to_vec();
                state.events.push(event.clone());
                notify(&mut state.watchers, &key, value);
            }
            Err(e) => {
                tracing::warn!(
                    block = number,
                    %hash,
                    signer = %extrinsic.signer,
                    function = %extrinsic.call.function,
                    error = %e,
                    "extrinsic failed"
                );
            }
        }

        (hash, result)
    }
}

/// Push `value` to every watcher of `key`, dropping closed ones.
fn notify(watchers: &mut HashMap<u64, Watcher>, key: &[u8], value: Option<ClaimRecord>) {
    watchers.retain(|id, watcher| {
        if watcher.key != key {
            return true;
        }
        let open = watcher.tx.send(value).is_ok();
        if !open {
            tracing::debug!(subscription = id, "claim watcher closed");
        }
        open
    });
}

/// In-process ledger implementing the claim module.
///
/// Cloning is cheap; clones share the same chain.
#[derive(Clone)]
pub struct SimLedger {
    inner: Arc<LedgerInner>,
}

impl SimLedger {
    pub fn new(config: LedgerConfig) -> Self {
        let genesis: [u8; 32] = Sha256::digest(b"poe-sim-genesis").into();
        tracing::info!(
            block_time_ms = config.block_time.as_millis() as u64,
            min_claim_len = config.min_claim_len,
            poe_module = config.poe_module,
            "created sim ledger"
        );
        Self {
            inner: Arc::new(LedgerInner {
                state: Mutex::new(LedgerState {
                    proofs: Proofs::new(config.min_claim_len),
                    best_number: 0,
                    best_hash: BlockHash(genesis),
                    pool_nonces: HashMap::new(),
                    watchers: HashMap::new(),
                    next_watch_id: 0,
                    events: Vec::new(),
                }),
                config,
                genesis,
            }),
        }
    }

    /// Current claim stored under `digest`.
    pub fn claim(&self, digest: &Digest) -> Option<ClaimRecord> {
        self.inner.state().proofs.get(&digest.to_key())
    }

    pub fn best_number(&self) -> u32 {
        self.inner.state().best_number
    }

    /// Events deposited so far, oldest first.
    pub fn events(&self) -> Vec<PoeEvent> {
        self.inner.state().events.clone()
    }

    /// Number of registered claim watchers.
    pub fn watcher_count(&self) -> usize {
        self.inner.state().watchers.len()
    }
}

impl Default for SimLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl ChainClient for SimLedger {
    fn has_query(&self, module: &str, item: &str) -> bool {
        self.inner.config.poe_module && module == POE_MODULE && item == PROOFS_QUERY
    }

    fn genesis_hash(&self) -> [u8; 32] {
        self.inner.genesis
    }

    async fn subscribe_claim(&self, digest: &Digest) -> Result<ClaimWatch, ChainError> {
        if !self.has_query(POE_MODULE, PROOFS_QUERY) {
            return Err(ChainError::QueryUnavailable {
                module: POE_MODULE.to_string(),
                item: PROOFS_QUERY.to_string(),
            });
        }

        let key = digest.to_key();
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut state = self.inner.state();
            let id = state.next_watch_id;
            state.next_watch_id += 1;
            let _ = tx.send(state.proofs.get(&key));
            state.watchers.insert(id, Watcher { key, tx });
            id
        };

        tracing::debug!(subscription = id, %digest, "claim watcher registered");

        let weak = Arc::downgrade(&self.inner);
        let handle = SubscriptionHandle::new(id, move || {
            if let Some(inner) = weak.upgrade() {
                inner.state().watchers.remove(&id);
            }
        });

        Ok(ClaimWatch {
            handle,
            updates: rx,
        })
    }

    async fn account_nonce(&self, account: &AccountId) -> Result<u64, ChainError> {
        Ok(self
            .inner
            .state()
            .pool_nonces
            .get(account)
            .copied()
            .unwrap_or(0))
    }

    async fn submit(&self, extrinsic: SignedExtrinsic) -> Result<TxProgress, ChainError> {
        let payload = SigningPayload {
            call: extrinsic.call.clone(),
            nonce: extrinsic.nonce,
            genesis: self.inner.genesis,
        };
        let Ok(message) = encode_signing_payload(&payload) else {
            return Err(ChainError::BadSignature);
        };
        if !account::verify(&extrinsic.signer, &message, &extrinsic.signature) {
            tracing::warn!(signer = %extrinsic.signer, "rejected extrinsic: bad signature");
            return Err(ChainError::BadSignature);
        }

        {
            let mut state = self.inner.state();
            let expected = state.pool_nonces.entry(extrinsic.signer).or_insert(0);
            if *expected != extrinsic.nonce {
                tracing::warn!(
                    signer = %extrinsic.signer,
                    expected = *expected,
                    got = extrinsic.nonce,
                    "rejected extrinsic: stale nonce"
                );
                return Err(ChainError::BadNonce {
                    expected: *expected,
                    got: extrinsic.nonce,
                });
            }
            *expected += 1;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(TxStatus::Ready);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let block_time = inner.config.block_time;
            if block_time > Duration::ZERO {
                tokio::time::sleep(block_time).await;
            }
            let (hash, result) = inner.seal(&extrinsic);
            match result {
                Ok(_) => {
                    let _ = tx.send(TxStatus::InBlock(hash));
                    let _ = tx.send(TxStatus::Finalized(hash));
                }
                Err(e) => {
                    let _ = tx.send(TxStatus::Failed(e.to_string()));
                }
            }
        });

        Ok(rx)
    }
}
