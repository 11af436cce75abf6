/**
 * Message Data Structures
 *
 * This module defines the chat message record as it travels over the wire:
 * in HTTP responses, in paginated history pages, and inside real-time
 * `NEW_MESSAGE` events.
 *
 * A `Message` is always the *joined* record: the stored row enriched with the
 * author's public `{id, login}` projection, so that a freshly created message,
 * a point lookup and a history page all have the same shape.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Kind of content a message carries
///
/// The set is closed: text messages carry the literal text, file messages
/// carry an opaque blob reference returned by the blob store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Text,
    File,
}

impl MessageType {
    /// Canonical storage/wire name (`TEXT` or `FILE`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::File => "FILE",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEXT" => Ok(Self::Text),
            "FILE" => Ok(Self::File),
            other => Err(SharedError::validation(
                "type",
                format!("unknown message type '{}'", other),
            )),
        }
    }
}

/// Public projection of the account that wrote a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub id: Uuid,
    pub login: String,
}

/// A chat message joined with its author
///
/// # Fields
/// * `id` - Globally unique id assigned by the exchange core at creation
/// * `message_type` - `TEXT` or `FILE` (serialized as `type`)
/// * `content` - Literal text, or the blob reference for files
/// * `is_changed` - Set by a future edit operation; always `false` on creation
/// * `author_id` - Id of the account that created the message
/// * `created_at` / `updated_at` - Assigned by the store
/// * `author` - The author's `{id, login}`
///
/// `id`, `message_type`, `author_id` and `created_at` never change once the
/// record exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub content: String,
    pub is_changed: bool,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: Author,
}

/// One page of the global history, newest first
///
/// `count` is the total number of messages in the store, taken by a separate
/// query from the page itself. Under concurrent inserts the two may disagree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagePage {
    pub count: i64,
    pub limit: i64,
    pub offset: i64,
    pub messages: Vec<Message>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Message {
        let author_id = Uuid::new_v4();
        let now = Utc::now();
        Message {
            id: Uuid::new_v4(),
            message_type: MessageType::Text,
            content: "hi".to_string(),
            is_changed: false,
            author_id,
            created_at: now,
            updated_at: now,
            author: Author {
                id: author_id,
                login: "alice".to_string(),
            },
        }
    }

    #[test]
    fn test_message_type_wire_names() {
        assert_eq!(serde_json::to_value(MessageType::Text).unwrap(), "TEXT");
        assert_eq!(serde_json::to_value(MessageType::File).unwrap(), "FILE");
        assert_eq!("FILE".parse::<MessageType>().unwrap(), MessageType::File);
    }

    #[test]
    fn test_unknown_message_type_is_rejected() {
        let err = "VIDEO".parse::<MessageType>().unwrap_err();
        assert!(err.to_string().contains("VIDEO"));
    }

    #[test]
    fn test_message_json_shape() {
        let message = sample();
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["type"], "TEXT");
        assert_eq!(value["content"], "hi");
        assert_eq!(value["isChanged"], false);
        assert_eq!(value["authorId"], message.author_id.to_string());
        assert_eq!(value["author"]["login"], "alice");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }
}
