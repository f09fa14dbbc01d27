//! Claim subscription lifecycle.
//!
//! At most one subscription is live at a time. Switching to a new digest
//! releases the current handle before the new request is issued, and every
//! request is tagged with a [`SubscriptionTicket`] so that late replies and
//! updates from a superseded request can be recognised and dropped.

use poe_protocol::Digest;

use crate::client::SubscriptionHandle;

/// Identifies one subscription request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionTicket {
    /// Increases with every request issued by a [`ClaimSubscription`].
    pub generation: u64,
    pub digest: Digest,
}

/// Where the subscription currently stands.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum SubscriptionState {
    #[default]
    Idle,
    /// Request issued, handle not yet returned.
    Subscribing(SubscriptionTicket),
    Subscribed(SubscriptionTicket, SubscriptionHandle),
}

/// Tracks the single live claim subscription.
#[derive(Debug, Default)]
pub struct ClaimSubscription {
    state: SubscriptionState,
    generation: u64,
}

impl ClaimSubscription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubscriptionState {
        &self.state
    }

    /// Ticket of the pending or live subscription.
    pub fn current(&self) -> Option<&SubscriptionTicket> {
        match &self.state {
            SubscriptionState::Idle => None,
            SubscriptionState::Subscribing(ticket) | SubscriptionState::Subscribed(ticket, _) => {
                Some(ticket)
            }
        }
    }

    /// Move to `digest`.
    ///
    /// Returns the ticket to request a subscription for, or `None` when
    /// nothing needs requesting (same digest, or no digest).
    pub fn switch_to(&mut self, digest: Option<Digest>) -> Option<SubscriptionTicket> {
        if self.current().map(|t| &t.digest) == digest.as_ref() {
            return None;
        }

        self.release();

        let digest = digest?;
        self.generation += 1;
        let ticket = SubscriptionTicket {
            generation: self.generation,
            digest,
        };
        tracing::debug!(
            generation = ticket.generation,
            digest = %ticket.digest,
            "requesting claim subscription"
        );
        self.state = SubscriptionState::Subscribing(ticket.clone());
        Some(ticket)
    }

    /// Record the handle returned for `ticket`.
    ///
    /// A handle for a superseded request is cancelled at once. Returns
    /// whether the handle was kept.
    pub fn established(&mut self, ticket: &SubscriptionTicket, handle: SubscriptionHandle) -> bool {
        match &self.state {
            SubscriptionState::Subscribing(current) if current == ticket => {
                tracing::debug!(
                    generation = ticket.generation,
                    subscription = handle.id(),
                    "claim subscription established"
                );
                self.state = SubscriptionState::Subscribed(ticket.clone(), handle);
                true
            }
            _ => {
                tracing::debug!(
                    generation = ticket.generation,
                    subscription = handle.id(),
                    "dropping superseded claim subscription"
                );
                handle.unsubscribe();
                false
            }
        }
    }

    /// Record that the request for `ticket` failed. Logged only.
    pub fn failed(&mut self, ticket: &SubscriptionTicket, error: &str) {
        tracing::warn!(
            generation = ticket.generation,
            digest = %ticket.digest,
            error,
            "claim subscription failed"
        );
        if matches!(&self.state, SubscriptionState::Subscribing(current) if current == ticket) {
            self.state = SubscriptionState::Idle;
        }
    }

    /// Whether an update tagged with `ticket` may be shown.
    pub fn accepts(&self, ticket: &SubscriptionTicket) -> bool {
        self.current() == Some(ticket)
    }

    /// Release the live subscription, if any.
    pub fn teardown(&mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let SubscriptionState::Subscribed(ticket, handle) = std::mem::take(&mut self.state) {
            tracing::debug!(
                generation = ticket.generation,
                subscription = handle.id(),
                "releasing claim subscription"
            );
            handle.unsubscribe();
        }
    }
}

impl Drop for ClaimSubscription {
    fn drop(&mut self) {
        self.release();
    }
}
