use crate::api::ApiError;
use crate::api::types::{GroupStats, Page, Register, SummaryMatrix, TopDisconnected, Vehicle};
use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;

/// Everything the main loop reacts to: terminal input plus the completion of
/// background requests. Fetch results carry the sequence number of the load
/// that issued them.
#[derive(Clone, Debug)]
pub enum Event {
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
    LoggedIn(Result<(), ApiError>),
    RegistersFetched(u64, Result<Page<Register>, ApiError>),
    VehiclesFetched(u64, Result<Page<Vehicle>, ApiError>),
    MatrixFetched(u64, Result<SummaryMatrix, ApiError>),
    GroupStatsFetched(i64, Result<GroupStats, ApiError>),
    TopDisconnectedFetched(Result<TopDisconnected, ApiError>),
    RegisterSaved(Result<Register, ApiError>),
}

pub type EventSender = mpsc::UnboundedSender<Event>;

#[derive(Debug)]
pub struct EventHandler {
    tx: EventSender,
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: std::time::Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task_tx = tx.clone();
        let _task = tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                let tick_delay = interval.tick();
                let crossterm_event = reader.next().fuse();
                let event = tokio::select! {
                    _ = tick_delay => Some(Event::Tick),
                    Some(Ok(evt)) = crossterm_event => match evt {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
                        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
                        _ => None,
                    },
                };

                if let Some(event) = event {
                    if task_tx.send(event).is_err() {
                        // Receiver gone: the app has shut down.
                        break;
                    }
                }
            }
        });
        Self { tx, rx, _task }
    }

    pub fn sender(&self) -> EventSender {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Unable to get event"))
    }
}

/// Delivers a background result; a closed channel only means the app is
/// exiting, so the result is dropped.
pub fn deliver(tx: &EventSender, event: Event) {
    if tx.send(event).is_err() {
        tracing::debug!("Event channel closed, dropping result");
    }
}
