//! Top-level application state machine.
//!
//! `App::update()` handles every message, from the claim panel and from
//! finished async work, and returns an `AppAction` for the shell to run.

use std::path::PathBuf;

use poe_chain::{ClaimSubscription, SubscriptionHandle, SubscriptionTicket};
use poe_files::HashedFile;
use poe_protocol::{CallDescriptor, ClaimRecord};
use poe_ui::screens::claim::{self, ClaimPanel};

/// Top-level application message.
#[derive(Debug, Clone)]
pub enum AppMessage {
    /// Messages from the claim panel.
    Claim(claim::Message),
    /// The file picker returned a path.
    FileChosen(PathBuf),
    /// File picker was cancelled by the user.
    FilePickCancelled,
    /// A file finished hashing.
    FileHashed { request: u64, file: HashedFile },
    /// A file could not be read.
    FileHashFailed { request: u64, error: String },
    /// The ledger accepted a claim subscription.
    Subscribed {
        ticket: SubscriptionTicket,
        handle: SubscriptionHandle,
    },
    /// The ledger rejected a claim subscription.
    SubscribeFailed {
        ticket: SubscriptionTicket,
        error: String,
    },
    /// A claim value pushed by a subscription.
    ClaimUpdated {
        ticket: SubscriptionTicket,
        record: Option<ClaimRecord>,
    },
    /// Transaction status text from the submitter.
    TxStatus(String),
}

/// Result of processing an app message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    None,
    /// Open the file picker.
    PickFile,
    /// Read and hash the file at `path`.
    HashFile { request: u64, path: PathBuf },
    /// Subscribe to the claim named by the ticket.
    Subscribe(SubscriptionTicket),
    /// Sign and submit a call.
    Submit(CallDescriptor),
}

/// Top-level application state.
#[derive(Debug, Default)]
pub struct App {
    /// Claim panel state.
    pub panel: ClaimPanel,
    /// The live claim subscription.
    pub subscription: ClaimSubscription,
    /// Whether the ledger exposes claim storage.
    pub ready: bool,
    /// Last hash request id handed out.
    last_request: u64,
    /// Hash request whose result will be applied.
    pending_request: Option<u64>,
}

impl App {
    pub fn new(ready: bool) -> Self {
        if !ready {
            tracing::warn!("ledger has no claim storage, claim panel hidden");
        }
        Self {
            ready,
            ..Self::default()
        }
    }

    /// Handle a top-level message and return an action.
    pub fn update(&mut self, message: AppMessage) -> AppAction {
        match message {
            AppMessage::Claim(msg) => match self.panel.update(msg) {
                claim::Action::None => AppAction::None,
                claim::Action::OpenFilePicker => AppAction::PickFile,
                claim::Action::Submit(call) => AppAction::Submit(call),
            },
            AppMessage::FileChosen(path) => {
                self.last_request += 1;
                self.pending_request = Some(self.last_request);
                tracing::debug!(request = self.last_request, path = %path.display(), "hashing file");
                AppAction::HashFile {
                    request: self.last_request,
                    path,
                }
            }
            AppMessage::FilePickCancelled => AppAction::None,
            AppMessage::FileHashed { request, file } => {
                if !self.take_pending(request) {
                    return AppAction::None;
                }
                let digest = file.digest.clone();
                self.panel.file_hashed(file.name, file.digest);
                match self.subscription.switch_to(Some(digest)) {
                    Some(ticket) => {
                        self.panel.claim_cleared();
                        AppAction::Subscribe(ticket)
                    }
                    // Same digest: the live subscription still holds the claim.
                    None => AppAction::None,
                }
            }
            AppMessage::FileHashFailed { request, error } => {
                if self.take_pending(request) {
                    tracing::error!(error = %error, "failed to hash file");
                    self.panel.file_failed(error);
                }
                AppAction::None
            }
            AppMessage::Subscribed { ticket, handle } => {
                self.subscription.established(&ticket, handle);
                AppAction::None
            }
            AppMessage::SubscribeFailed { ticket, error } => {
                self.subscription.failed(&ticket, &error);
                AppAction::None
            }
            AppMessage::ClaimUpdated { ticket, record } => {
                if !self.subscription.accepts(&ticket) {
                    tracing::debug!(
                        generation = ticket.generation,
                        digest = %ticket.digest,
                        "ignoring update from superseded subscription"
                    );
                    return AppAction::None;
                }
                match record {
                    Some(record) => self
                        .panel
                        .claim_updated(record.owner.to_string(), record.block_number.to_string()),
                    None => self.panel.claim_cleared(),
                }
                AppAction::None
            }
            AppMessage::TxStatus(status) => {
                self.panel.set_status(status);
                AppAction::None
            }
        }
    }

    /// Whether `request` is the hash result to apply. Clears it if so.
    fn take_pending(&mut self, request: u64) -> bool {
        if self.pending_request == Some(request) {
            self.pending_request = None;
            true
        } else {
            tracing::debug!(request, pending = ?self.pending_request, "ignoring stale hash result");
            false
        }
    }
}
