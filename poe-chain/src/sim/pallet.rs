//! Claim storage rules.

use std::collections::HashMap;

use poe_protocol::{AccountId, CallDescriptor, ClaimRecord, Digest, POE_MODULE};
use thiserror::Error;

/// Why a call was rejected at dispatch. Display strings match the names a
/// ledger node reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("ProofAlreadyExist")]
    ProofAlreadyExist,
    #[error("ClaimNotExist")]
    ClaimNotExist,
    #[error("NotClaimOwner")]
    NotClaimOwner,
    #[error("NotValidClaimLen")]
    NotValidClaimLen,
    #[error("invalid destination account: {0}")]
    InvalidDestination(String),
    #[error("{function} expects {expected} parameters, got {got}")]
    BadArity {
        function: String,
        expected: usize,
        got: usize,
    },
    #[error("unknown call {module}.{function}")]
    UnknownCall { module: String, function: String },
}

/// Events deposited by successful claim calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoeEvent {
    ClaimCreated {
        owner: AccountId,
        claim: Vec<u8>,
    },
    ClaimRevoked {
        owner: AccountId,
        claim: Vec<u8>,
    },
    ClaimTransferred {
        from: AccountId,
        claim: Vec<u8>,
        to: AccountId,
    },
}

impl PoeEvent {
    /// Storage key touched by the call.
    pub fn claim(&self) -> &[u8] {
        match self {
            PoeEvent::ClaimCreated { claim, .. }
            | PoeEvent::ClaimRevoked { claim, .. }
            | PoeEvent::ClaimTransferred { claim, .. } => claim,
        }
    }
}

/// Claim storage: key bytes to `(owner, block number)`.
#[derive(Debug, Default)]
pub struct Proofs {
    claims: HashMap<Vec<u8>, ClaimRecord>,
    /// Shortest accepted claim key. `0` disables the check.
    min_claim_len: u32,
}

impl Proofs {
    pub fn new(min_claim_len: u32) -> Self {
        Self {
            claims: HashMap::new(),
            min_claim_len,
        }
    }

    pub fn get(&self, claim: &[u8]) -> Option<ClaimRecord> {
        self.claims.get(claim).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Apply `call` signed by `sender` in block `block_number`.
    pub fn dispatch(
        &mut self,
        sender: AccountId,
        block_number: u32,
        call: &CallDescriptor,
    ) -> Result<PoeEvent, DispatchError> {
        if call.module != POE_MODULE {
            return Err(unknown(call));
        }
        match call.function.as_str() {
            "createClaim" => {
                let [claim] = params::<1>(call)?;
                self.create_claim(sender, block_number, claim_key(claim))
            }
            "revokeClaim" => {
                let [claim] = params::<1>(call)?;
                self.revoke_claim(sender, claim_key(claim))
            }
            "transferClaim" => {
                let [claim, to] = params::<2>(call)?;
                let to = AccountId::from_hex(to)
                    .map_err(|e| DispatchError::InvalidDestination(e.to_string()))?;
                self.transfer_claim(sender, block_number, claim_key(claim), to)
            }
            _ => Err(unknown(call)),
        }
    }

    fn create_claim(
        &mut self,
        sender: AccountId,
        block_number: u32,
        claim: Vec<u8>,
    ) -> Result<PoeEvent, DispatchError> {
        if self.claims.contains_key(&claim) {
            return Err(DispatchError::ProofAlreadyExist);
        }
        if (claim.len() as u32) < self.min_claim_len {
            return Err(DispatchError::NotValidClaimLen);
        }

        self.claims.insert(
            claim.clone(),
            ClaimRecord {
                owner: sender,
                block_number,
            },
        );
        Ok(PoeEvent::ClaimCreated {
            owner: sender,
            claim,
        })
    }

    fn revoke_claim(&mut self, sender: AccountId, claim: Vec<u8>) -> Result<PoeEvent, DispatchError> {
        let record = self.claims.get(&claim).ok_or(DispatchError::ClaimNotExist)?;
        if record.owner != sender {
            return Err(DispatchError::NotClaimOwner);
        }

        self.claims.remove(&claim);
        Ok(PoeEvent::ClaimRevoked {
            owner: sender,
            claim,
        })
    }

    fn transfer_claim(
        &mut self,
        sender: AccountId,
        block_number: u32,
        claim: Vec<u8>,
        to: AccountId,
    ) -> Result<PoeEvent, DispatchError> {
        let record = self.claims.get(&claim).ok_or(DispatchError::ClaimNotExist)?;
        if record.owner != sender {
            return Err(DispatchError::NotClaimOwner);
        }

        self.claims.insert(
            claim.clone(),
            ClaimRecord {
                owner: to,
                block_number,
            },
        );
        Ok(PoeEvent::ClaimTransferred {
            from: sender,
            claim,
            to,
        })
    }
}

fn claim_key(param: &str) -> Vec<u8> {
    Digest::new(param).to_key()
}

fn params<const N: usize>(call: &CallDescriptor) -> Result<[&str; N], DispatchError> {
    let got: Vec<&str> = call.params.iter().map(String::as_str).collect();
    got.try_into().map_err(|got: Vec<&str>| DispatchError::BadArity {
        function: call.function.clone(),
        expected: N,
        got: got.len(),
    })
}

fn unknown(call: &CallDescriptor) -> DispatchError {
    DispatchError::UnknownCall {
        module: call.module.clone(),
        function: call.function.clone(),
    }
}

#[cfg(test)]
mod tests {
    use poe_protocol::ClaimCall;

    use super::*;

    const ALICE: AccountId = AccountId([1; 32]);
    const BOB: AccountId = AccountId([2; 32]);

    fn create(digest: &str) -> CallDescriptor {
        ClaimCall::Create {
            digest: Digest::from(digest),
        }
        .descriptor()
    }

    fn revoke(digest: &str) -> CallDescriptor {
        ClaimCall::Revoke {
            digest: Digest::from(digest),
        }
        .descriptor()
    }

    fn transfer(digest: &str, to: &str) -> CallDescriptor {
        ClaimCall::Transfer {
            digest: Digest::from(digest),
            to: to.to_string(),
        }
        .descriptor()
    }

    #[test]
    fn create_claim_stores_owner_and_block() {
        let mut proofs = Proofs::default();
        let event = proofs.dispatch(ALICE, 5, &create("0x0102")).unwrap();

        assert_eq!(
            event,
            PoeEvent::ClaimCreated {
                owner: ALICE,
                claim: vec![1, 2]
            }
        );
        assert_eq!(
            proofs.get(&[1, 2]),
            Some(ClaimRecord {
                owner: ALICE,
                block_number: 5
            })
        );
    }

    #[test]
    fn duplicate_create_fails() {
        let mut proofs = Proofs::default();
        proofs.dispatch(ALICE, 1, &create("0x01")).unwrap();
        assert_eq!(
            proofs.dispatch(BOB, 2, &create("0x01")),
            Err(DispatchError::ProofAlreadyExist)
        );
        assert_eq!(proofs.get(&[1]).unwrap().owner, ALICE);
    }

    #[test]
    fn short_claims_rejected_when_minimum_set() {
        let mut proofs = Proofs::new(4);
        assert_eq!(
            proofs.dispatch(ALICE, 1, &create("0x0102")),
            Err(DispatchError::NotValidClaimLen)
        );
        assert!(proofs.dispatch(ALICE, 1, &create("0x01020304")).is_ok());
    }

    #[test]
    fn revoke_requires_existing_claim_and_owner() {
        let mut proofs = Proofs::default();
        assert_eq!(
            proofs.dispatch(ALICE, 1, &revoke("0x01")),
            Err(DispatchError::ClaimNotExist)
        );

        proofs.dispatch(ALICE, 1, &create("0x01")).unwrap();
        assert_eq!(
            proofs.dispatch(BOB, 2, &revoke("0x01")),
            Err(DispatchError::NotClaimOwner)
        );

        proofs.dispatch(ALICE, 3, &revoke("0x01")).unwrap();
        assert!(proofs.is_empty());
    }

    #[test]
    fn transfer_moves_ownership_and_restamps_block() {
        let mut proofs = Proofs::default();
        proofs.dispatch(ALICE, 1, &create("0x01")).unwrap();

        let event = proofs
            .dispatch(ALICE, 9, &transfer("0x01", &BOB.to_hex()))
            .unwrap();
        assert_eq!(
            event,
            PoeEvent::ClaimTransferred {
                from: ALICE,
                claim: vec![1],
                to: BOB
            }
        );
        assert_eq!(
            proofs.get(&[1]),
            Some(ClaimRecord {
                owner: BOB,
                block_number: 9
            })
        );

        assert_eq!(
            proofs.dispatch(ALICE, 10, &transfer("0x01", &ALICE.to_hex())),
            Err(DispatchError::NotClaimOwner)
        );
    }

    #[test]
    fn transfer_to_garbage_address_fails_at_dispatch() {
        let mut proofs = Proofs::default();
        proofs.dispatch(ALICE, 1, &create("0x01")).unwrap();

        let err = proofs
            .dispatch(ALICE, 2, &transfer("0x01", "bob"))
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidDestination(_)));
        assert_eq!(proofs.get(&[1]).unwrap().owner, ALICE);
    }

    #[test]
    fn unknown_calls_and_bad_arity() {
        let mut proofs = Proofs::default();

        let mut call = create("0x01");
        call.function = "burnClaim".to_string();
        assert!(matches!(
            proofs.dispatch(ALICE, 1, &call),
            Err(DispatchError::UnknownCall { .. })
        ));

        let mut call = create("0x01");
        call.module = "balances".to_string();
        assert!(matches!(
            proofs.dispatch(ALICE, 1, &call),
            Err(DispatchError::UnknownCall { .. })
        ));

        let mut call = create("0x01");
        call.params.push("extra".to_string());
        assert_eq!(
            proofs.dispatch(ALICE, 1, &call),
            Err(DispatchError::BadArity {
                function: "createClaim".to_string(),
                expected: 1,
                got: 2
            })
        );
    }

    #[test]
    fn dispatch_error_names() {
        assert_eq!(DispatchError::NotClaimOwner.to_string(), "NotClaimOwner");
        assert_eq!(DispatchError::ClaimNotExist.to_string(), "ClaimNotExist");
    }
}
