/**
 * Real-time Event Broadcasting
 *
 * The exchange core never calls the hub directly. It hands each created
 * message to a `HubPublisher`, a one-way unbounded queue, and returns. A
 * single dispatcher task drains the queue and calls
 * `NotificationHub::publish`, so the write path is never slowed by the number
 * or health of subscribers.
 *
 * The single dispatcher keeps publication order equal to hand-off order, so
 * every subscriber sees `NEW_MESSAGE` events in the same relative order.
 */
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::backend::realtime::hub::NotificationHub;
use crate::shared::Message;

/// Sending half of the exchange → hub queue
#[derive(Clone)]
pub struct HubPublisher {
    tx: mpsc::UnboundedSender<Message>,
}

impl HubPublisher {
    /// Queue a message for fan-out
    ///
    /// Never blocks and never fails from the caller's point of view. If the
    /// dispatcher is gone the message is dropped with a warning.
    pub fn publish(&self, message: Message) {
        let id = message.id;
        if self.tx.send(message).is_err() {
            tracing::warn!("[Realtime] Dispatcher stopped, {} not broadcast", id);
        }
    }

    /// A publisher whose queue the caller drains, for tests
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

/// Start the dispatcher task for `hub`
///
/// The task ends when every `HubPublisher` clone has been dropped.
pub fn spawn_dispatcher(hub: Arc<NotificationHub>) -> (HubPublisher, JoinHandle<()>) {
    let (publisher, mut rx) = HubPublisher::channel();

    let handle = tokio::spawn(async move {
        tracing::info!("[Realtime] Dispatcher started");
        while let Some(message) = rx.recv().await {
            let report = hub.publish(message);
            tracing::debug!(
                "[Realtime] NEW_MESSAGE delivered to {} subscribers",
                report.delivered
            );
        }
        tracing::info!("[Realtime] Dispatcher stopped");
    });

    (publisher, handle)
}
