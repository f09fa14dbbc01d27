//! Integration tests covering claim flows end-to-end against the in-process ledger.

mod helpers;

mod claim_lifecycle;
mod readiness;
mod subscription_switching;
