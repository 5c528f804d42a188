//! Fire-and-forget UX event logging.
//!
//! Events are pushed onto a bounded queue and posted by a single worker task,
//! one at a time, in order. [`EventLogger::log`] never waits: when the queue is
//! full the event is dropped with a warning. Failures to resolve identifiers or
//! to reach the server are logged and otherwise ignored.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use moodping_client::ApiClient;
use moodping_core::Identity;
use moodping_types::{EventPayload, UxEvent};

pub(crate) struct QueuedEvent {
    event: UxEvent,
    /// Signalled once the POST has finished, whatever its outcome.
    done: Option<oneshot::Sender<()>>,
}

/// Handle for enqueueing UX events. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventLogger {
    tx: Option<mpsc::Sender<QueuedEvent>>,
}

impl std::fmt::Debug for QueuedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedEvent")
            .field("event", &self.event)
            .field("awaited", &self.done.is_some())
            .finish()
    }
}

impl EventLogger {
    /// Start the worker. It runs until every clone of the returned logger has
    /// been dropped and the queue is drained.
    #[must_use]
    pub fn spawn(
        api: ApiClient,
        identity: Arc<Identity>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (logger, rx) = Self::queued(capacity);
        let worker = tokio::spawn(run_worker(rx, api, identity));
        (logger, worker)
    }

    /// A logger that accepts and discards every event.
    #[must_use]
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub(crate) fn queued(capacity: usize) -> (Self, mpsc::Receiver<QueuedEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx: Some(tx) }, rx)
    }

    /// Enqueue without waiting.
    pub fn log(&self, event: UxEvent) {
        let Some(tx) = &self.tx else { return };
        match tx.try_send(QueuedEvent { event, done: None }) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(queued)) => {
                tracing::warn!(
                    "Event queue full; dropping {} event",
                    queued.event.event_type()
                );
            }
            Err(mpsc::error::TrySendError::Closed(queued)) => {
                tracing::warn!(
                    "Event worker stopped; dropping {} event",
                    queued.event.event_type()
                );
            }
        }
    }

    /// Enqueue, waiting for room if necessary, and resolve once the worker has
    /// finished posting this event.
    pub async fn log_and_wait(&self, event: UxEvent) {
        let Some(tx) = &self.tx else { return };
        let (done_tx, done_rx) = oneshot::channel();
        let queued = QueuedEvent {
            event,
            done: Some(done_tx),
        };
        if let Err(mpsc::error::SendError(queued)) = tx.send(queued).await {
            tracing::warn!(
                "Event worker stopped; dropping {} event",
                queued.event.event_type()
            );
            return;
        }
        // A dropped sender means the worker is gone; either way we are done.
        let _ = done_rx.await;
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<QueuedEvent>,
    api: ApiClient,
    identity: Arc<Identity>,
) {
    while let Some(queued) = rx.recv().await {
        post_one(&api, &identity, &queued.event).await;
        if let Some(done) = queued.done {
            let _ = done.send(());
        }
    }
    tracing::debug!("Event worker finished");
}

async fn post_one(api: &ApiClient, identity: &Identity, event: &UxEvent) {
    let ids = identity
        .session_id()
        .and_then(|session| identity.user_id().map(|user| (session, user)));
    let (session_id, user_id) = match ids {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!("Skipping {} event: {e}", event.event_type());
            return;
        }
    };

    let payload = EventPayload::new(event, session_id, user_id);
    if let Err(e) = api.post_event(&payload).await {
        tracing::warn!("Failed to log {} event: {e}", event.event_type());
    }
}
