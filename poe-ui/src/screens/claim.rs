//! Claim panel: hash a file, watch its claim, create/revoke/transfer it.
//!
//! The panel only holds display state. Picking and hashing files, watching
//! the ledger, and submitting calls happen outside and report back through
//! the setter methods.

use iced::widget::{button, column, container, row, text, text_input};
use iced::{Alignment, Element, Length, Renderer, Theme};
use poe_protocol::{CallDescriptor, ClaimCall, Digest};

/// Which claim operation a button stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimKind {
    Create,
    Revoke,
    Transfer,
}

/// Messages emitted by the claim panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// "Your file" button pressed.
    ChooseFile,
    /// Recipient address input changed.
    RecipientChanged(String),
    /// One of the claim buttons pressed.
    Submit(ClaimKind),
}

/// Result of processing a claim panel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// Open the file picker.
    OpenFilePicker,
    /// Sign and submit this call.
    Submit(CallDescriptor),
}

/// Claim panel state.
#[derive(Debug, Clone, Default)]
pub struct ClaimPanel {
    /// Latest transaction status, verbatim from the submitter.
    pub status: String,
    /// Digest of the selected file.
    pub digest: Option<Digest>,
    /// Name of the selected file.
    pub file_name: Option<String>,
    /// Owner of the claim on `digest`, as displayed.
    pub owner: String,
    /// Block the claim was stamped in, as displayed.
    pub block_number: String,
    /// Transfer recipient, unvalidated.
    pub recipient: String,
    /// Error message (e.g. the file could not be read).
    pub error: Option<String>,
}

impl ClaimPanel {
    /// A file was hashed: show its digest. The claim fields are left to the
    /// subscription that owns them.
    pub fn file_hashed(&mut self, file_name: String, digest: Digest) {
        tracing::info!(file_name = %file_name, digest = %digest, "file selected");
        self.file_name = Some(file_name);
        self.digest = Some(digest);
        self.error = None;
    }

    /// The selected file could not be read. The previous digest stays.
    pub fn file_failed(&mut self, error: String) {
        self.error = Some(format!("Failed to read file: {error}"));
    }

    /// A claim value arrived for the current digest.
    pub fn claim_updated(&mut self, owner: String, block_number: String) {
        self.owner = owner;
        self.block_number = block_number;
    }

    /// No claim is stored under the current digest.
    pub fn claim_cleared(&mut self) {
        self.owner.clear();
        self.block_number.clear();
    }

    /// Replace the status line.
    pub fn set_status(&mut self, status: String) {
        self.status = status;
    }

    /// The call a button would submit, if a file has been hashed.
    pub fn call_for(&self, kind: ClaimKind) -> Option<ClaimCall> {
        let digest = self.digest.clone()?;
        Some(match kind {
            ClaimKind::Create => ClaimCall::Create { digest },
            ClaimKind::Revoke => ClaimCall::Revoke { digest },
            ClaimKind::Transfer => ClaimCall::Transfer {
                digest,
                to: self.recipient.clone(),
            },
        })
    }

    /// Handle a message and return any external action.
    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::ChooseFile => Action::OpenFilePicker,
            Message::RecipientChanged(value) => {
                self.recipient = value;
                Action::None
            }
            Message::Submit(kind) => match self.call_for(kind) {
                Some(call) => Action::Submit(call.descriptor()),
                None => {
                    tracing::debug!(?kind, "claim button pressed without a digest");
                    Action::None
                }
            },
        }
    }

    pub fn status_line(&self) -> String {
        format!("status {}", self.status)
    }

    pub fn digest_line(&self) -> String {
        let digest = self.digest.as_ref().map(Digest::as_str).unwrap_or_default();
        format!("digest {digest}")
    }

    pub fn claim_info_line(&self) -> String {
        format!(
            "Claim info: owner {}, blockNumber {}",
            self.owner, self.block_number
        )
    }

    /// Render the panel only when the ledger exposes claim storage.
    pub fn gated_view(&self, ready: bool) -> Option<Element<'_, Message, Theme, Renderer>> {
        ready.then(|| self.view())
    }

    /// Render the claim panel.
    pub fn view(&self) -> Element<'_, Message, Theme, Renderer> {
        let title = text("POE Module").size(28);

        let file_label = self.file_name.as_deref().unwrap_or("No file chosen");
        let file_row = row![
            text("Your file").size(14),
            button(text("Choose File")).on_press(Message::ChooseFile),
            text(file_label).size(12),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let claim_button = |kind: ClaimKind| {
            let label = match kind {
                ClaimKind::Create => "Create Claim",
                ClaimKind::Revoke => "Revoke Claim",
                ClaimKind::Transfer => "Transfer Claim",
            };
            button(text(label)).on_press_maybe(self.digest.as_ref().map(|_| Message::Submit(kind)))
        };

        let claim_row = row![
            claim_button(ClaimKind::Create),
            claim_button(ClaimKind::Revoke),
        ]
        .spacing(10);

        let recipient_input = text_input("address", &self.recipient)
            .on_input(Message::RecipientChanged)
            .padding(8)
            .width(Length::Fixed(420.0));
        let transfer_row = row![
            text("Transfer To Account").size(14),
            recipient_input,
            claim_button(ClaimKind::Transfer),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let mut content = column![
            title,
            file_row,
            claim_row,
            transfer_row,
            text(self.status_line()).size(13),
            text(self.digest_line()).size(13),
            text(self.claim_info_line()).size(13),
        ]
        .spacing(12)
        .padding(20);

        if let Some(ref err) = self.error {
            content = content.push(
                text(err)
                    .size(12)
                    .color(iced::Color::from_rgb(1.0, 0.3, 0.3)),
            );
        }

        container(content).width(Length::Fill).into()
    }
}
