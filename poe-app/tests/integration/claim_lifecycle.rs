//! Create, transfer and revoke a claim on a hashed file, watching the record.

use poe_chain::{AccountPair, ChainClient};
use poe_protocol::{ClaimCall, ClaimRecord, TxStatus};
use poe_ui::screens::claim::{Action, ClaimKind, ClaimPanel, Message};

use crate::helpers::{collect_statuses, hashed_file, init_test_tracing, next_update, setup_ledger};

fn show(panel: &mut ClaimPanel, record: Option<ClaimRecord>) {
    match record {
        Some(r) => panel.claim_updated(r.owner.to_string(), r.block_number.to_string()),
        None => panel.claim_cleared(),
    }
}

#[tokio::test]
async fn create_transfer_revoke_updates_panel() {
    init_test_tracing();
    let tmp = tempfile::TempDir::new().unwrap();
    let (ledger, submitter) = setup_ledger();
    let alice = AccountPair::dev("alice");
    let bob = AccountPair::dev("bob");

    let file = hashed_file(&tmp, "deed.txt", b"the deed to the house").await;
    let mut panel = ClaimPanel::default();
    panel.file_hashed(file.name.clone(), file.digest.clone());

    let mut watch = ledger.subscribe_claim(&file.digest).await.unwrap();
    let first = next_update(&mut watch.updates).await;
    assert_eq!(first, None);
    show(&mut panel, first);

    // Create
    let Action::Submit(call) = panel.update(Message::Submit(ClaimKind::Create)) else {
        panic!("expected submit action");
    };
    let statuses = collect_statuses(submitter.submit(&alice, call).await).await;
    assert_eq!(statuses[0], TxStatus::Sending);
    assert_eq!(statuses[1], TxStatus::Ready);
    assert!(matches!(statuses.last(), Some(TxStatus::Finalized(_))));
    panel.set_status(statuses.last().unwrap().to_string());
    assert!(panel.status.starts_with("😉 Finalized. Block hash: 0x"));

    let record = next_update(&mut watch.updates).await;
    show(&mut panel, record);
    assert_eq!(panel.owner, alice.account_id().to_string());
    assert_eq!(panel.block_number, "1");

    // Transfer to bob
    panel.update(Message::RecipientChanged(bob.account_id().to_hex()));
    let Action::Submit(call) = panel.update(Message::Submit(ClaimKind::Transfer)) else {
        panic!("expected submit action");
    };
    let statuses = collect_statuses(submitter.submit(&alice, call).await).await;
    assert!(matches!(statuses.last(), Some(TxStatus::Finalized(_))));

    show(&mut panel, next_update(&mut watch.updates).await);
    assert_eq!(panel.owner, bob.account_id().to_string());
    assert_eq!(panel.block_number, "2");

    // Bob revokes
    let Action::Submit(call) = panel.update(Message::Submit(ClaimKind::Revoke)) else {
        panic!("expected submit action");
    };
    let statuses = collect_statuses(submitter.submit(&bob, call).await).await;
    assert!(matches!(statuses.last(), Some(TxStatus::Finalized(_))));

    show(&mut panel, next_update(&mut watch.updates).await);
    assert!(panel.owner.is_empty());
    assert!(panel.block_number.is_empty());
    assert!(ledger.claim(&file.digest).is_none());
}

#[tokio::test]
async fn rejected_calls_report_failure_status() {
    init_test_tracing();
    let tmp = tempfile::TempDir::new().unwrap();
    let (ledger, submitter) = setup_ledger();
    let alice = AccountPair::dev("alice");
    let mallory = AccountPair::dev("mallory");

    let file = hashed_file(&tmp, "song.mp3", &[0xde, 0xad, 0xbe, 0xef]).await;
    let digest = file.digest.clone();

    let create = ClaimCall::Create {
        digest: digest.clone(),
    };
    collect_statuses(submitter.submit(&alice, create.descriptor()).await).await;

    let statuses = collect_statuses(submitter.submit(&mallory, create.descriptor()).await).await;
    assert_eq!(
        statuses.last().unwrap().to_string(),
        "😞 Transaction Failed: ProofAlreadyExist"
    );

    let revoke = ClaimCall::Revoke {
        digest: digest.clone(),
    };
    let statuses = collect_statuses(submitter.submit(&mallory, revoke.descriptor()).await).await;
    assert_eq!(
        statuses.last().unwrap().to_string(),
        "😞 Transaction Failed: NotClaimOwner"
    );

    assert_eq!(ledger.claim(&digest).unwrap().owner, alice.account_id());
}

#[tokio::test]
async fn transfer_without_recipient_fails_locally() {
    init_test_tracing();
    let tmp = tempfile::TempDir::new().unwrap();
    let (ledger, submitter) = setup_ledger();
    let alice = AccountPair::dev("alice");

    let file = hashed_file(&tmp, "notes.md", b"# notes").await;
    let mut panel = ClaimPanel::default();
    panel.file_hashed(file.name, file.digest.clone());

    let Action::Submit(call) = panel.update(Message::Submit(ClaimKind::Transfer)) else {
        panic!("expected submit action");
    };
    let statuses = collect_statuses(submitter.submit(&alice, call).await).await;

    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0], TxStatus::Sending);
    assert!(matches!(&statuses[1], TxStatus::Failed(reason) if reason.contains("missing required parameter")));
    assert_eq!(ledger.best_number(), 0);
}
