//! In-process ledger for local use and tests.
//!
//! [`SimLedger`] implements [`ChainClient`](crate::client::ChainClient) with
//! the proof-of-existence storage rules, one block per extrinsic, and pushed
//! claim updates. No sockets, no persistence.
//!
//! # Example
//!
//! ```ignore
//! let ledger = Arc::new(SimLedger::new(LedgerConfig::default()));
//! let submitter = TxSubmitter::new(Arc::clone(&ledger));
//! let mut watch = ledger.subscribe_claim(&digest).await?;
//! let progress = submitter.submit(&AccountPair::dev("alice"), call.descriptor()).await;
//! ```

mod ledger;
mod pallet;

pub use ledger::{LedgerConfig, SimLedger};
pub use pallet::{DispatchError, PoeEvent, Proofs};
