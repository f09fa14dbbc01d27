//! Switching files moves the single claim watcher to the new digest.

use poe_chain::{AccountPair, ChainClient, ClaimSubscription, SubscriptionState};
use poe_protocol::ClaimCall;

use crate::helpers::{collect_statuses, hashed_file, init_test_tracing, next_update, setup_ledger};

#[tokio::test]
async fn switching_digest_releases_previous_watcher() {
    init_test_tracing();
    let tmp = tempfile::TempDir::new().unwrap();
    let (ledger, submitter) = setup_ledger();
    let alice = AccountPair::dev("alice");

    let first = hashed_file(&tmp, "a.txt", b"first").await;
    let second = hashed_file(&tmp, "b.txt", b"second").await;
    assert_ne!(first.digest, second.digest);

    let mut sub = ClaimSubscription::new();

    let ticket = sub.switch_to(Some(first.digest.clone())).unwrap();
    let mut first_watch = ledger.subscribe_claim(&ticket.digest).await.unwrap();
    assert!(sub.established(&ticket, first_watch.handle.clone()));
    assert_eq!(next_update(&mut first_watch.updates).await, None);
    assert_eq!(ledger.watcher_count(), 1);

    let ticket = sub.switch_to(Some(second.digest.clone())).unwrap();
    assert!(!first_watch.handle.is_active());
    assert_eq!(ledger.watcher_count(), 0);

    let mut second_watch = ledger.subscribe_claim(&ticket.digest).await.unwrap();
    assert!(sub.established(&ticket, second_watch.handle.clone()));
    assert_eq!(ledger.watcher_count(), 1);
    assert_eq!(next_update(&mut second_watch.updates).await, None);

    // The released stream ends; the live one sees the new claim.
    assert_eq!(first_watch.updates.recv().await, None);

    let create = ClaimCall::Create {
        digest: second.digest.clone(),
    };
    collect_statuses(submitter.submit(&alice, create.descriptor()).await).await;
    let record = next_update(&mut second_watch.updates).await.unwrap();
    assert_eq!(record.owner, alice.account_id());

    sub.teardown();
    assert_eq!(*sub.state(), SubscriptionState::Idle);
    assert_eq!(ledger.watcher_count(), 0);
}

#[tokio::test]
async fn late_subscription_is_cancelled_on_arrival() {
    init_test_tracing();
    let tmp = tempfile::TempDir::new().unwrap();
    let (ledger, _submitter) = setup_ledger();

    let first = hashed_file(&tmp, "a.txt", b"first").await;
    let second = hashed_file(&tmp, "b.txt", b"second").await;

    let mut sub = ClaimSubscription::new();
    let stale = sub.switch_to(Some(first.digest)).unwrap();
    let current = sub.switch_to(Some(second.digest)).unwrap();

    let late = ledger.subscribe_claim(&stale.digest).await.unwrap();
    assert!(!sub.established(&stale, late.handle.clone()));
    assert!(!late.handle.is_active());
    assert!(!sub.accepts(&stale));
    assert!(sub.accepts(&current));
    assert_eq!(ledger.watcher_count(), 0);
}

#[tokio::test]
async fn dropping_subscription_releases_watcher() {
    init_test_tracing();
    let tmp = tempfile::TempDir::new().unwrap();
    let (ledger, _submitter) = setup_ledger();
    let file = hashed_file(&tmp, "a.txt", b"first").await;

    {
        let mut sub = ClaimSubscription::new();
        let ticket = sub.switch_to(Some(file.digest)).unwrap();
        let watch = ledger.subscribe_claim(&ticket.digest).await.unwrap();
        sub.established(&ticket, watch.handle);
        assert_eq!(ledger.watcher_count(), 1);
    }

    assert_eq!(ledger.watcher_count(), 0);
}
