use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::system::snapshot::Snapshot;

/// Everything the UI loop reacts to, from both producers: terminal input
/// and the sampler thread.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Sample(Box<Snapshot>),
    SampleFailed(String),
}

/// Single-consumer hand-off for the UI loop. Input events are forwarded
/// by a spawned task; the sampler gets its own sender clone. The loop is
/// the only reader, which keeps all dashboard state single-writer.
pub struct EventHandler {
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    _input_task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();

        let input_tx = tx.clone();
        let input_task = tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            while let Some(Ok(evt)) = reader.next().await {
                let mapped = match evt {
                    CrosstermEvent::Key(key) => Some(Event::Key(key)),
                    CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                    _ => None,
                };
                if let Some(e) = mapped
                    && input_tx.send(e).is_err()
                {
                    break;
                }
            }
        });

        Self {
            tx,
            rx,
            _input_task: input_task,
        }
    }

    /// Sender for the sampler thread.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
