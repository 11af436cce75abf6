//! Real-time Update Module
//!
//! Pushes every newly created message to all live subscribers.
//!
//! # Architecture
//!
//! - **`hub`** - `NotificationHub`, the registry of live connections and the
//!   fan-out itself
//! - **`broadcast`** - `HubPublisher` and the dispatcher task: the one-way
//!   queue between the exchange core and the hub
//! - **`websocket`** - `GET /ws` transport
//! - **`subscription`** - `GET /realtime` Server-Sent Events transport
//!
//! ```text
//! MessageExchange ──HubPublisher──> dispatcher ──publish──> NotificationHub
//!                                                              ├─> /ws conn
//!                                                              └─> /realtime conn
//! ```
//!
//! Delivery is at most once per connection per message. There is no replay
//! for connections that were not live at publish time.

/// Live connection registry and fan-out
pub mod hub;

/// Exchange → hub queue and dispatcher task
pub mod broadcast;

/// WebSocket transport
pub mod websocket;

/// Server-Sent Events transport
pub mod subscription;

pub use broadcast::{spawn_dispatcher, HubPublisher};
pub use hub::{ConnectionId, ConnectionState, NotificationHub, PublishReport, Subscription};
pub use subscription::handle_realtime_subscription;
pub use websocket::handle_websocket;
