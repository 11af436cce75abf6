/**
 * Notification Hub
 *
 * The hub owns the live set of subscriber connections and fans every published
 * message out to all of them.
 *
 * # Connection Lifecycle
 *
 * ```text
 * open() ──> CONNECTING ──register()──> CONNECTED ──unregister()/drop──> DISCONNECTED
 * ```
 *
 * - `open` allocates a connection id and its bounded outbound queue
 * - `register` adds the connection to the live set and returns a
 *   `Subscription`, the receiving end the transport reads from
 * - `unregister` removes it again; calling it twice, or for an id that was
 *   never registered, is a no-op
 * - dropping a `Subscription` unregisters it
 *
 * # Publishing
 *
 * `publish` snapshots the live set and offers the event to each connection
 * with `try_send`. It never awaits a subscriber:
 *
 * - a closed queue means the transport is gone: the connection is unregistered
 * - a full queue means the subscriber is not keeping up: it is treated as hung
 *   and unregistered, which ends its stream once the backlog is drained
 *
 * Neither case is reported to the publisher as an error.
 *
 * Connections registered after the snapshot do not receive the event; there
 * is no replay. History is only available through paginated listing.
 */
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

use crate::shared::{Message, RealtimeEvent};

/// Outbound queue capacity used by `NotificationHub::default()`
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 64;

/// Opaque handle of one subscriber connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Lifecycle state of a subscriber connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

/// Outcome of one `publish` call, for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Connections the event was queued for
    pub delivered: usize,
    /// Connections dropped because their queue was closed or full
    pub dropped: usize,
}

type EventSender = mpsc::Sender<Arc<RealtimeEvent>>;
type EventReceiver = mpsc::Receiver<Arc<RealtimeEvent>>;

/// A connection that has been opened but is not yet live
pub struct PendingConnection {
    id: ConnectionId,
    sender: EventSender,
    receiver: EventReceiver,
}

impl PendingConnection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::Connecting
    }
}

/// Receiving end of a live connection
///
/// Dropping it unregisters the connection.
pub struct Subscription {
    id: ConnectionId,
    receiver: EventReceiver,
    hub: Weak<NotificationHub>,
}

impl Subscription {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Next event, or `None` once the hub has dropped this connection and
    /// its backlog is drained
    pub async fn recv(&mut self) -> Option<Arc<RealtimeEvent>> {
        self.receiver.recv().await
    }

    /// Non-blocking variant of `recv`
    pub fn try_recv(&mut self) -> Result<Arc<RealtimeEvent>, TryRecvError> {
        self.receiver.try_recv()
    }

    pub fn state(&self) -> ConnectionState {
        match self.hub.upgrade() {
            Some(hub) if hub.is_live(self.id) => ConnectionState::Connected,
            _ => ConnectionState::Disconnected,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.unregister(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Registry of live connections and fan-out point for new messages
pub struct NotificationHub {
    connections: DashMap<ConnectionId, EventSender>,
    next_id: AtomicU64,
    buffer: usize,
}

impl NotificationHub {
    /// Create a hub whose subscribers may fall `buffer` events behind
    /// before being treated as hung
    pub fn new(buffer: usize) -> Self {
        Self {
            connections: DashMap::new(),
            next_id: AtomicU64::new(1),
            buffer: buffer.max(1),
        }
    }

    /// Allocate an id and outbound queue for a new connection
    pub fn open(&self) -> PendingConnection {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(self.buffer);
        PendingConnection {
            id,
            sender,
            receiver,
        }
    }

    /// Add a connection to the live set
    ///
    /// No acknowledgment is sent to the subscriber.
    pub fn register(self: &Arc<Self>, connection: PendingConnection) -> Subscription {
        let PendingConnection {
            id,
            sender,
            receiver,
        } = connection;

        self.connections.insert(id, sender);
        tracing::info!(
            "[Hub] {} connected ({} live)",
            id,
            self.connections.len()
        );

        Subscription {
            id,
            receiver,
            hub: Arc::downgrade(self),
        }
    }

    /// `open` followed by `register`
    pub fn connect(self: &Arc<Self>) -> Subscription {
        self.register(self.open())
    }

    /// Remove a connection from the live set
    ///
    /// Returns whether the connection was live. Safe to call any number of
    /// times.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        let removed = self.connections.remove(&id).is_some();
        if removed {
            tracing::info!(
                "[Hub] {} disconnected ({} live)",
                id,
                self.connections.len()
            );
        }
        removed
    }

    pub fn is_live(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.connections.len()
    }

    /// Deliver a `NEW_MESSAGE` event for `message` to every live connection
    pub fn publish(&self, message: Message) -> PublishReport {
        let event = Arc::new(RealtimeEvent::new_message(message));

        // Snapshot first so no shard lock is held while sending
        let targets: Vec<(ConnectionId, EventSender)> = self
            .connections
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let mut report = PublishReport::default();
        for (id, sender) in targets {
            match sender.try_send(Arc::clone(&event)) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("[Hub] {} is not keeping up, dropping connection", id);
                    self.unregister(id);
                    report.dropped += 1;
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!("[Hub] {} already closed, dropping connection", id);
                    self.unregister(id);
                    report.dropped += 1;
                }
            }
        }

        tracing::debug!(
            "[Hub] Published {} to {} connections ({} dropped)",
            event.data.id,
            report.delivered,
            report.dropped
        );
        report
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_BUFFER)
    }
}
