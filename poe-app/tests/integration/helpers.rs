//! Shared test helpers for claim integration tests.
//!
//! Re-exports from `poe_chain::testing` for convenience. All test infrastructure
//! is consolidated there to avoid duplication across crates.

use std::path::PathBuf;
use std::sync::Arc;

pub use poe_chain::testing::{collect_statuses, init_test_tracing, next_update};
use poe_chain::{SimLedger, TxSubmitter};
use poe_files::HashedFile;

/// A ledger and a submitter sharing it.
pub fn setup_ledger() -> (Arc<SimLedger>, TxSubmitter<SimLedger>) {
    let ledger = Arc::new(SimLedger::default());
    let submitter = TxSubmitter::new(Arc::clone(&ledger));
    (ledger, submitter)
}

/// Write `contents` to `name` inside `dir` and hash it.
pub async fn hashed_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> HashedFile {
    let path: PathBuf = dir.path().join(name);
    tokio::fs::write(&path, contents).await.unwrap();
    poe_files::hash_file(&path).await.unwrap()
}
