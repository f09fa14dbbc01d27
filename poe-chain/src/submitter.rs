//! Signed submission of claim calls.
//!
//! The submitter signs a [`CallDescriptor`] as given, hands it to the ledger,
//! and reports progress as a stream of [`TxStatus`] values.

use std::sync::Arc;

use poe_protocol::call::{encode_signing_payload, SigningPayload};
use poe_protocol::{CallDescriptor, TxStatus};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};

use crate::account::AccountPair;
use crate::client::{ChainClient, ChainError, SignedExtrinsic, TxProgress};

/// Errors raised before the ledger reports any progress.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("missing required parameter #{index}")]
    MissingParam { index: usize },
    #[error("failed to encode call: {0}")]
    Encode(#[from] postcard::Error),
    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Signs calls with an account and submits them to a ledger.
///
/// Clones share one submission lock, so a nonce is never read twice before
/// the extrinsic using it reaches the pool.
pub struct TxSubmitter<C> {
    client: Arc<C>,
    pool_lock: Arc<Mutex<()>>,
}

impl<C> Clone for TxSubmitter<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            pool_lock: Arc::clone(&self.pool_lock),
        }
    }
}

impl<C: ChainClient> TxSubmitter<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            pool_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Sign and submit `call`.
    ///
    /// The returned stream always starts with [`TxStatus::Sending`] and ends
    /// with a terminal status. Failures before the ledger accepts the call
    /// arrive as [`TxStatus::Failed`].
    pub async fn submit(&self, account: &AccountPair, call: CallDescriptor) -> TxProgress {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(TxStatus::Sending);

        tracing::info!(
            account = %account.account_id(),
            module = %call.module,
            function = %call.function,
            "submitting signed call"
        );

        match self.sign_and_submit(account, call).await {
            Ok(mut progress) => {
                tokio::spawn(async move {
                    while let Some(status) = progress.recv().await {
                        tracing::debug!(%status, "transaction status");
                        if tx.send(status).is_err() {
                            break;
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "transaction submission failed");
                let _ = tx.send(TxStatus::Failed(e.to_string()));
            }
        }

        rx
    }

    async fn sign_and_submit(
        &self,
        account: &AccountPair,
        call: CallDescriptor,
    ) -> Result<TxProgress, SubmitError> {
        if let Some(index) = call
            .sig_flags
            .iter()
            .zip(&call.params)
            .position(|(required, param)| *required && param.trim().is_empty())
        {
            return Err(SubmitError::MissingParam { index });
        }

        let signer = account.account_id();
        let _pool = self.pool_lock.lock().await;
        let nonce = self.client.account_nonce(&signer).await?;
        let message = encode_signing_payload(&SigningPayload {
            call: call.clone(),
            nonce,
            genesis: self.client.genesis_hash(),
        })?;

        let extrinsic = SignedExtrinsic {
            signer,
            call,
            nonce,
            signature: account.sign(&message),
        };
        Ok(self.client.submit(extrinsic).await?)
    }
}
