//! The ledger client seam.
//!
//! [`ChainClient`] is implemented by [`SimLedger`](crate::sim::SimLedger) and
//! is the only way the rest of the workspace talks to a ledger.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use poe_protocol::{AccountId, CallDescriptor, ClaimRecord, Digest, TxStatus};
use thiserror::Error;
use tokio::sync::mpsc;

/// Pushed values of one claim key. `None` means no claim is stored.
pub type ClaimUpdates = mpsc::UnboundedReceiver<Option<ClaimRecord>>;

/// Status events of one submitted transaction.
pub type TxProgress = mpsc::UnboundedReceiver<TxStatus>;

/// Errors returned by a ledger client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("query {module}.{item} is not available")]
    QueryUnavailable { module: String, item: String },
    #[error("bad signature")]
    BadSignature,
    #[error("invalid transaction: stale nonce (expected {expected}, got {got})")]
    BadNonce { expected: u64, got: u64 },
    #[error("ledger is shut down")]
    Shutdown,
}

/// A call signed by `signer` over its [`SigningPayload`](poe_protocol::SigningPayload).
#[derive(Debug, Clone)]
pub struct SignedExtrinsic {
    pub signer: AccountId,
    pub call: CallDescriptor,
    pub nonce: u64,
    pub signature: Vec<u8>,
}

/// Cancels one live subscription. Clones share the same cancellation, and
/// unsubscribing more than once is a no-op.
#[derive(Clone)]
pub struct SubscriptionHandle {
    id: u64,
    cancel: Arc<dyn Fn() + Send + Sync>,
    cancelled: Arc<AtomicBool>,
}

impl SubscriptionHandle {
    pub fn new(id: u64, cancel: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            id,
            cancel: Arc::new(cancel),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        !self.cancelled.load(Ordering::Acquire)
    }

    /// Stop the subscription. The update stream ends once the ledger drops
    /// its sender.
    pub fn unsubscribe(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            tracing::debug!(subscription = self.id, "unsubscribing");
            (self.cancel)();
        }
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl PartialEq for SubscriptionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

impl Eq for SubscriptionHandle {}

/// A live claim subscription: the handle that cancels it and its update stream.
#[derive(Debug)]
pub struct ClaimWatch {
    pub handle: SubscriptionHandle,
    pub updates: ClaimUpdates,
}

/// Capability exposed by a ledger node.
pub trait ChainClient: Send + Sync + 'static {
    /// Whether the node exposes the storage query `module.item`.
    fn has_query(&self, module: &str, item: &str) -> bool;

    /// Hash of the first block, bound into every signature.
    fn genesis_hash(&self) -> [u8; 32];

    /// Watch the claim stored under `digest`. The current value is pushed
    /// first, then every change.
    fn subscribe_claim(
        &self,
        digest: &Digest,
    ) -> impl Future<Output = Result<ClaimWatch, ChainError>> + Send;

    /// Next nonce the ledger will accept from `account`.
    fn account_nonce(
        &self,
        account: &AccountId,
    ) -> impl Future<Output = Result<u64, ChainError>> + Send;

    /// Hand a signed extrinsic to the ledger's pool.
    fn submit(
        &self,
        extrinsic: SignedExtrinsic,
    ) -> impl Future<Output = Result<TxProgress, ChainError>> + Send;
}
