//! Background weather fetches
//!
//! Fetches run on tokio tasks and report back over a channel, so the UI loop
//! never blocks on the network. Each message carries the ticket it was started
//! with; the app decides whether the result is still current.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::FetchTicket;
use crate::data::{WeatherClient, WeatherError, WeatherReport};

/// Outcome of one background fetch
#[derive(Debug)]
pub struct FetchMessage {
    pub ticket: FetchTicket,
    pub result: Result<WeatherReport, WeatherError>,
}

/// Spawns fetches and collects their results
pub struct FetchWorker {
    client: WeatherClient,
    sender: mpsc::Sender<FetchMessage>,
    /// Channel for receiving finished fetches
    pub receiver: mpsc::Receiver<FetchMessage>,
}

impl FetchWorker {
    /// Creates a worker that fetches with `client`
    pub fn new(client: WeatherClient) -> Self {
        let (sender, receiver) = mpsc::channel(8);
        Self {
            client,
            sender,
            receiver,
        }
    }

    /// Starts fetching the ticket's query in the background.
    ///
    /// Superseded fetches are not cancelled; their results are simply ignored
    /// by the receiver.
    pub fn spawn(&self, ticket: FetchTicket) -> JoinHandle<()> {
        let client = self.client.clone();
        let tx = self.sender.clone();

        tokio::spawn(async move {
            let result = client.fetch_report(&ticket.query).await;
            if tx.send(FetchMessage { ticket, result }).await.is_err() {
                tracing::debug!("fetch result dropped, receiver closed");
            }
        })
    }

    /// Waits for the next finished fetch
    pub async fn recv(&mut self) -> Option<FetchMessage> {
        self.receiver.recv().await
    }
}

/// Checks for a finished fetch without blocking
///
/// # Returns
/// * `Some(FetchMessage)` if a fetch has finished
/// * `None` if nothing is pending
pub fn try_recv(worker: &mut FetchWorker) -> Option<FetchMessage> {
    worker.receiver.try_recv().ok()
}
