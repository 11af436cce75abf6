/**
 * Real-time Event System
 *
 * This module defines the events pushed to live subscribers. The chat room has
 * a single event kind today, `NEW_MESSAGE`, emitted once per successfully
 * created message and carrying the full joined `Message`.
 */
use serde::{Deserialize, Serialize};

use crate::shared::message::Message;

/// Kind of real-time event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    NewMessage,
}

impl EventType {
    /// Event name used on every transport (WebSocket frame tag, SSE event name)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewMessage => "NEW_MESSAGE",
        }
    }
}

/// Real-time event as delivered to a subscriber
///
/// Serialized as `{"event": "NEW_MESSAGE", "data": {...message...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealtimeEvent {
    pub event: EventType,
    pub data: Message,
}

impl RealtimeEvent {
    pub fn new_message(message: Message) -> Self {
        Self {
            event: EventType::NewMessage,
            data: message,
        }
    }

    pub fn name(&self) -> &'static str {
        self.event.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::message::{Author, MessageType};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_new_message_event_envelope() {
        let author_id = Uuid::new_v4();
        let now = Utc::now();
        let message = Message {
            id: Uuid::new_v4(),
            message_type: MessageType::File,
            content: "uploads/abc.png".to_string(),
            is_changed: false,
            author_id,
            created_at: now,
            updated_at: now,
            author: Author {
                id: author_id,
                login: "bob".to_string(),
            },
        };

        let event = RealtimeEvent::new_message(message.clone());
        assert_eq!(event.name(), "NEW_MESSAGE");

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "NEW_MESSAGE");
        assert_eq!(value["data"]["id"], message.id.to_string());
        assert_eq!(value["data"]["type"], "FILE");
    }
}
