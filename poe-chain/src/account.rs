//! Signing accounts.

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use poe_protocol::AccountId;
use sha2::{Digest, Sha256};

/// A named ed25519 keypair used to sign claim calls.
#[derive(Clone)]
pub struct AccountPair {
    name: String,
    key: SigningKey,
}

impl AccountPair {
    /// Build an account from a 32-byte secret seed.
    pub fn from_seed(name: impl Into<String>, seed: [u8; 32]) -> Self {
        Self {
            name: name.into(),
            key: SigningKey::from_bytes(&seed),
        }
    }

    /// Deterministic development account derived from its name.
    ///
    /// Anyone can derive these keys; they are for local ledgers only.
    pub fn dev(name: &str) -> Self {
        let seed: [u8; 32] = Sha256::new()
            .chain_update(b"poe-dev-account:")
            .chain_update(name.as_bytes())
            .finalize()
            .into();
        Self::from_seed(name, seed)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account_id(&self) -> AccountId {
        AccountId(self.key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.key.sign(message).to_bytes().to_vec()
    }
}

impl fmt::Debug for AccountPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountPair")
            .field("name", &self.name)
            .field("account", &self.account_id())
            .finish()
    }
}

/// Check an ed25519 signature made by `account` over `message`.
pub fn verify(account: &AccountId, message: &[u8], signature: &[u8]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(&account.0) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    key.verify(message, &signature).is_ok()
}
