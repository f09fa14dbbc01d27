//! Transaction progress as reported by the signed submitter.

use std::fmt;

use crate::types::BlockHash;

/// One step in the life of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    /// Signed locally, on its way to the ledger.
    Sending,
    /// Accepted into the ledger's pool.
    Ready,
    /// Included in a block.
    InBlock(BlockHash),
    /// The including block is final.
    Finalized(BlockHash),
    /// Rejected locally, by the pool, or by dispatch.
    Failed(String),
}

impl TxStatus {
    /// No further statuses follow a terminal one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TxStatus::Finalized(_) | TxStatus::Failed(_))
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStatus::Sending => write!(f, "Sending..."),
            TxStatus::Ready => write!(f, "Current transaction status: Ready"),
            TxStatus::InBlock(_) => write!(f, "Current transaction status: InBlock"),
            TxStatus::Finalized(hash) => write!(f, "😉 Finalized. Block hash: {hash}"),
            TxStatus::Failed(reason) => write!(f, "😞 Transaction Failed: {reason}"),
        }
    }
}
