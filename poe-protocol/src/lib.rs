//! Shared types and wire encoding for the proof-of-existence client.

pub mod call;
pub mod status;
pub mod types;

pub use call::{CallDescriptor, ClaimCall, SigningPayload, POE_MODULE, PROOFS_QUERY};
pub use status::TxStatus;
pub use types::{AccountId, AddressError, BlockHash, ClaimRecord, Digest};
