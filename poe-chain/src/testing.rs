//! Shared test utilities for poe tests.
//!
//! Available behind the `test-util` feature or in `#[cfg(test)]` within poe-chain.

use std::time::Duration;

use poe_protocol::{ClaimRecord, TxStatus};

use crate::client::{ClaimUpdates, TxProgress};

/// Default timeout for a pushed claim update.
pub const UPDATE_TIMEOUT_SECS: u64 = 5;

/// Default timeout for a transaction to reach a terminal status.
pub const TX_TIMEOUT_SECS: u64 = 5;

/// Initialise a tracing subscriber for tests.
///
/// Respects the `RUST_LOG` environment variable, defaults to `debug`.
/// Safe to call multiple times; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Wait for the next pushed claim value.
///
/// Panics on timeout or when the stream has ended.
pub async fn next_update(updates: &mut ClaimUpdates) -> Option<ClaimRecord> {
    match tokio::time::timeout(Duration::from_secs(UPDATE_TIMEOUT_SECS), updates.recv()).await {
        Ok(Some(value)) => value,
        Ok(None) => panic!("claim update stream ended"),
        Err(_) => panic!("timed out waiting for claim update after {UPDATE_TIMEOUT_SECS}s"),
    }
}

/// Drain a transaction's statuses up to and including the terminal one.
///
/// Panics if no terminal status arrives within [`TX_TIMEOUT_SECS`].
pub async fn collect_statuses(mut progress: TxProgress) -> Vec<TxStatus> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(TX_TIMEOUT_SECS);
    let mut statuses = Vec::new();
    loop {
        match tokio::time::timeout_at(deadline, progress.recv()).await {
            Ok(Some(status)) => {
                let done = status.is_terminal();
                statuses.push(status);
                if done {
                    return statuses;
                }
            }
            Ok(None) => panic!("status stream ended without a terminal status: {statuses:?}"),
            Err(_) => panic!("timed out waiting for transaction, got {statuses:?}"),
        }
    }
}
