mod app;
mod files;
pub mod settings;

use std::sync::Arc;

use app::{AppAction, AppMessage};
use poe_chain::{AccountPair, ChainClient, SimLedger, SubscriptionTicket, TxSubmitter};
use poe_protocol::{CallDescriptor, POE_MODULE, PROOFS_QUERY};
use settings::Settings;

use iced::{Element, Task};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing_subscriber::EnvFilter;

/// Top-level Iced application wrapper.
///
/// Bridges the `App` state machine to the Iced runtime by converting
/// `AppAction` returns into `iced::Task` effects. The ledger client and the
/// signing account are handed in at construction.
struct PoeApp<C> {
    app: app::App,
    client: Arc<C>,
    submitter: TxSubmitter<C>,
    account: AccountPair,
}

impl<C: ChainClient> PoeApp<C> {
    fn new(client: Arc<C>, account: AccountPair) -> Self {
        let ready = client.has_query(POE_MODULE, PROOFS_QUERY);
        Self {
            app: app::App::new(ready),
            submitter: TxSubmitter::new(Arc::clone(&client)),
            client,
            account,
        }
    }

    fn update(&mut self, message: AppMessage) -> Task<AppMessage> {
        match self.app.update(message) {
            AppAction::None => Task::none(),
            AppAction::PickFile => Task::perform(files::pick_file(), |picked| match picked {
                Some(path) => AppMessage::FileChosen(path),
                None => AppMessage::FilePickCancelled,
            }),
            AppAction::HashFile { request, path } => Task::perform(
                async move { poe_files::hash_file(&path).await },
                move |result| match result {
                    Ok(file) => AppMessage::FileHashed { request, file },
                    Err(e) => AppMessage::FileHashFailed {
                        request,
                        error: format!("{e:#}"),
                    },
                },
            ),
            AppAction::Subscribe(ticket) => self.subscribe(ticket),
            AppAction::Submit(call) => self.submit(call),
        }
    }

    /// Request a claim subscription, then stream its updates tagged with `ticket`.
    fn subscribe(&self, ticket: SubscriptionTicket) -> Task<AppMessage> {
        let client = Arc::clone(&self.client);
        let digest = ticket.digest.clone();
        Task::future(async move { client.subscribe_claim(&digest).await }).then(move |result| {
            let ticket = ticket.clone();
            match result {
                Ok(watch) => {
                    let tag = ticket.clone();
                    Task::done(AppMessage::Subscribed {
                        ticket,
                        handle: watch.handle,
                    })
                    .chain(Task::run(
                        UnboundedReceiverStream::new(watch.updates),
                        move |record| AppMessage::ClaimUpdated {
                            ticket: tag.clone(),
                            record,
                        },
                    ))
                }
                Err(e) => Task::done(AppMessage::SubscribeFailed {
                    ticket,
                    error: e.to_string(),
                }),
            }
        })
    }

    /// Sign and submit `call`, streaming its statuses back as text.
    fn submit(&self, call: CallDescriptor) -> Task<AppMessage> {
        let submitter = self.submitter.clone();
        let account = self.account.clone();
        Task::future(async move { submitter.submit(&account, call).await }).then(|progress| {
            Task::run(UnboundedReceiverStream::new(progress), |status| {
                AppMessage::TxStatus(status.to_string())
            })
        })
    }

    fn view(&self) -> Element<'_, AppMessage> {
        match self.app.panel.gated_view(self.app.ready) {
            Some(panel) => panel.map(AppMessage::Claim),
            None => iced::widget::Column::new().into(),
        }
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load();

    let account = AccountPair::dev(&settings.account);
    let ledger = Arc::new(SimLedger::new(settings.ledger_config()));

    tracing::info!(account = %account.account_id(), name = account.name(), "poe starting");

    iced::application(
        move || PoeApp::new(Arc::clone(&ledger), account.clone()),
        PoeApp::<SimLedger>::update,
        PoeApp::<SimLedger>::view,
    )
    .title("Proof of Existence")
    .theme(iced::Theme::from(settings.theme))
    .run()
}
