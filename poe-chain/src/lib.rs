//! Ledger client seam, claim subscriptions, and signed submission.

pub mod account;
pub mod client;
pub mod sim;
pub mod submitter;
pub mod subscription;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use account::AccountPair;
pub use client::{
    ChainClient, ChainError, ClaimUpdates, ClaimWatch, SignedExtrinsic, SubscriptionHandle,
    TxProgress,
};
pub use sim::{LedgerConfig, SimLedger};
pub use submitter::{SubmitError, TxSubmitter};
pub use subscription::{ClaimSubscription, SubscriptionState, SubscriptionTicket};
