//! Call descriptors for the proof-of-existence module and their signing payload.

use serde::{Deserialize, Serialize};

use crate::types::Digest;

/// Name of the ledger module that stores claims.
pub const POE_MODULE: &str = "poeModule";

/// Name of the claim storage query exposed by [`POE_MODULE`].
pub const PROOFS_QUERY: &str = "proofs";

/// A module call, described by name with its ordered parameters.
///
/// `sig_flags[i]` marks parameter `i` as required by the signed submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDescriptor {
    pub module: String,
    pub function: String,
    pub params: Vec<String>,
    pub sig_flags: Vec<bool>,
}

/// The three claim operations offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimCall {
    Create { digest: Digest },
    Revoke { digest: Digest },
    Transfer { digest: Digest, to: String },
}

impl ClaimCall {
    /// Build the fixed call descriptor for this operation.
    pub fn descriptor(&self) -> CallDescriptor {
        let (function, params) = match self {
            ClaimCall::Create { digest } => ("createClaim", vec![digest.to_string()]),
            ClaimCall::Revoke { digest } => ("revokeClaim", vec![digest.to_string()]),
            ClaimCall::Transfer { digest, to } => {
                ("transferClaim", vec![digest.to_string(), to.clone()])
            }
        };
        CallDescriptor {
            module: POE_MODULE.to_string(),
            function: function.to_string(),
            sig_flags: vec![true; params.len()],
            params,
        }
    }
}

/// Everything a signer commits to when authorising a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningPayload {
    pub call: CallDescriptor,
    pub nonce: u64,
    pub genesis: [u8; 32],
}

/// Serialize a `SigningPayload` to compact binary via postcard.
pub fn encode_signing_payload(payload: &SigningPayload) -> Result<Vec<u8>, postcard::Error> {
    postcard::to_allocvec(payload)
}

/// Deserialize a `SigningPayload` from postcard bytes.
pub fn decode_signing_payload(data: &[u8]) -> Result<SigningPayload, postcard::Error> {
    postcard::from_bytes(data)
}
