//! The claim panel is hidden when the ledger lacks claim storage.

use poe_chain::{ChainClient, ChainError, LedgerConfig, SimLedger};
use poe_protocol::{Digest, POE_MODULE, PROOFS_QUERY};
use poe_ui::screens::claim::ClaimPanel;

use crate::helpers::init_test_tracing;

#[tokio::test]
async fn ledger_without_claim_storage_hides_panel() {
    init_test_tracing();
    let ledger = SimLedger::new(LedgerConfig {
        poe_module: false,
        ..LedgerConfig::default()
    });

    let ready = ledger.has_query(POE_MODULE, PROOFS_QUERY);
    assert!(!ready);
    assert!(ClaimPanel::default().gated_view(ready).is_none());

    let err = ledger
        .subscribe_claim(&Digest::from("abc123"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::QueryUnavailable { .. }));
}

#[tokio::test]
async fn ledger_with_claim_storage_shows_panel() {
    init_test_tracing();
    let ledger = SimLedger::default();

    let ready = ledger.has_query(POE_MODULE, PROOFS_QUERY);
    assert!(ready);
    assert!(ClaimPanel::default().gated_view(ready).is_some());
}
