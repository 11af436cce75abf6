//! Message Exchange Core
//!
//! The single choke point through which every message enters the chat room.
//! `MessageExchange` turns a validated "new message" request into a durable,
//! uniquely identified, author-attributed record and hands it to the
//! notification hub.
//!
//! # Operations
//!
//! - **`create_message`** - assign an id, insert, re-read the joined record,
//!   publish `NEW_MESSAGE`, return the record
//! - **`get_message`** - joined point lookup
//! - **`list_messages`** - newest-first page plus the total count
//!
//! # Guarantees
//!
//! - A failed insert is returned untouched and nothing is published.
//! - A successful insert is published exactly once. Publishing is a one-way
//!   hand-off to the dispatcher and never affects the result.
//! - The persist-then-publish body runs on its own task, so dropping the
//!   caller's future (e.g. an aborted HTTP request) does not cancel it.
//! - There is no global lock. Concurrent creates are independent rows made
//!   distinct by their generated ids.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::realtime::HubPublisher;
use crate::backend::store::{MessageStore, NewMessage, StoreError};
use crate::shared::{Message, MessagePage, MessageType, SharedError};

/// Pagination parameters and their defaults
pub mod pagination;

pub use pagination::{PageQuery, Pagination};

/// Errors returned by the exchange core
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Malformed input caught by the core's own checks
    #[error(transparent)]
    Validation(#[from] SharedError),

    /// No message with this id
    #[error("Message {0} not found")]
    NotFound(Uuid),

    /// Propagated unchanged from the store
    #[error(transparent)]
    Persistence(#[from] StoreError),

    /// The task running the create panicked or was cancelled
    #[error("Message creation was interrupted: {0}")]
    Interrupted(String),
}

/// Create/read orchestration over a `MessageStore`
#[derive(Clone)]
pub struct MessageExchange {
    store: Arc<dyn MessageStore>,
    publisher: HubPublisher,
}

impl MessageExchange {
    pub fn new(store: Arc<dyn MessageStore>, publisher: HubPublisher) -> Self {
        Self { store, publisher }
    }

    /// Create a message authored by `author_id`
    ///
    /// # Errors
    ///
    /// * `ExchangeError::Validation` - empty content
    /// * `ExchangeError::Persistence` - insert failed, including
    ///   `StoreError::UnknownAuthor` when `author_id` resolves to no account
    pub async fn create_message(
        &self,
        message_type: MessageType,
        content: String,
        author_id: Uuid,
    ) -> Result<Message, ExchangeError> {
        validate_content(message_type, &content)?;

        let draft = NewMessage {
            id: Uuid::new_v4(),
            message_type,
            content,
            is_changed: false,
            author_id,
        };

        let exchange = self.clone();
        tokio::spawn(async move { exchange.persist_and_publish(draft).await })
            .await
            .map_err(|e| ExchangeError::Interrupted(e.to_string()))?
    }

    async fn persist_and_publish(&self, draft: NewMessage) -> Result<Message, ExchangeError> {
        let id = draft.id;
        let author_id = draft.author_id;

        let stored = self.store.insert(draft).await.map_err(|e| {
            tracing::warn!("[Exchange] Insert of {} by {} failed: {}", id, author_id, e);
            e
        })?;

        // Re-read so the returned and published payload has the list/get shape
        let message = self.store.get(stored.id).await?.ok_or_else(|| {
            StoreError::Inconsistent(format!("message {} missing right after insert", stored.id))
        })?;

        self.publisher.publish(message.clone());
        tracing::info!(
            "[Exchange] Created {} message {} by {}",
            message.message_type,
            message.id,
            message.author.login
        );

        Ok(message)
    }

    /// Joined record for `id`
    pub async fn get_message(&self, id: Uuid) -> Result<Message, ExchangeError> {
        self.store
            .get(id)
            .await?
            .ok_or(ExchangeError::NotFound(id))
    }

    /// One page of the history, newest first
    pub async fn list_messages(&self, page: Pagination) -> Result<MessagePage, ExchangeError> {
        let listing = self.store.list(page.limit, page.offset).await?;
        Ok(MessagePage {
            count: listing.total,
            limit: page.limit,
            offset: page.offset,
            messages: listing.messages,
        })
    }
}

fn validate_content(message_type: MessageType, content: &str) -> Result<(), SharedError> {
    match message_type {
        MessageType::Text if content.trim().is_empty() => {
            Err(SharedError::validation("text", "text must not be empty"))
        }
        MessageType::File if content.is_empty() => {
            Err(SharedError::validation("file", "file reference must not be empty"))
        }
        MessageType::Text | MessageType::File => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::{AccountStore, MemoryStore, MessageListing, StoredMessage};
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use tokio::sync::mpsc::UnboundedReceiver;

    async fn setup() -> (MessageExchange, Arc<MemoryStore>, UnboundedReceiver<Message>, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let author = store
            .create_account(Uuid::new_v4(), "alice", "hash")
            .await
            .unwrap();
        let (publisher, rx) = HubPublisher::channel();
        let exchange = MessageExchange::new(store.clone(), publisher);
        (exchange, store, rx, author.id)
    }

    struct UnreachableStore;

    #[async_trait]
    impl MessageStore for UnreachableStore {
        async fn insert(&self, _message: NewMessage) -> Result<StoredMessage, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn get(&self, _id: Uuid) -> Result<Option<Message>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn list_window(&self, _l: i64, _o: i64) -> Result<Vec<Message>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn count(&self) -> Result<i64, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn list(&self, _l: i64, _o: i64) -> Result<MessageListing, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn test_create_text_message_publishes_once() {
        let (exchange, _store, mut rx, author_id) = setup().await;

        let message = exchange
            .create_message(MessageType::Text, "hi".to_string(), author_id)
            .await
            .unwrap();

        assert_eq!(message.message_type, MessageType::Text);
        assert_eq!(message.content, "hi");
        assert_eq!(message.author_id, author_id);
        assert_eq!(message.author.login, "alice");
        assert!(!message.is_changed);

        assert_eq!(rx.try_recv().unwrap(), message);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let (exchange, _store, _rx, author_id) = setup().await;

        let created = exchange
            .create_message(MessageType::File, "uploads/a.png".to_string(), author_id)
            .await
            .unwrap();
        let fetched = exchange.get_message(created.id).await.unwrap();

        assert_eq!(
            Message { updated_at: created.updated_at, ..fetched },
            created
        );
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (exchange, _store, _rx, _author_id) = setup().await;
        let id = Uuid::new_v4();
        assert_matches!(
            exchange.get_message(id).await,
            Err(ExchangeError::NotFound(missing)) if missing == id
        );
    }

    #[tokio::test]
    async fn test_empty_content_is_rejected_before_store() {
        let (exchange, store, mut rx, author_id) = setup().await;

        let err = exchange
            .create_message(MessageType::Text, "   ".to_string(), author_id)
            .await
            .unwrap_err();
        assert_matches!(err, ExchangeError::Validation(_));

        let err = exchange
            .create_message(MessageType::File, String::new(), author_id)
            .await
            .unwrap_err();
        assert_matches!(err, ExchangeError::Validation(_));

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unknown_author_propagates_without_publish() {
        let (exchange, store, mut rx, _author_id) = setup().await;
        let stranger = Uuid::new_v4();

        let err = exchange
            .create_message(MessageType::Text, "hi".to_string(), stranger)
            .await
            .unwrap_err();

        assert_matches!(
            err,
            ExchangeError::Persistence(StoreError::UnknownAuthor(id)) if id == stranger
        );
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_store_failure_propagates_without_publish() {
        let (publisher, mut rx) = HubPublisher::channel();
        let exchange = MessageExchange::new(Arc::new(UnreachableStore), publisher);

        let err = exchange
            .create_message(MessageType::Text, "hi".to_string(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert_matches!(err, ExchangeError::Persistence(StoreError::Database(_)));
        assert!(rx.try_recv().is_err());

        assert_matches!(
            exchange.list_messages(Pagination::default()).await,
            Err(ExchangeError::Persistence(_))
        );
    }

    #[tokio::test]
    async fn test_list_scenario() {
        let (exchange, _store, _rx, author_id) = setup().await;
        let _m1 = exchange
            .create_message(MessageType::Text, "M1".to_string(), author_id)
            .await
            .unwrap();
        let m2 = exchange
            .create_message(MessageType::Text, "M2".to_string(), author_id)
            .await
            .unwrap();

        let page = exchange
            .list_messages(Pagination::new(Some(1), Some(0)))
            .await
            .unwrap();

        assert_eq!(
            page,
            MessagePage {
                count: 2,
                limit: 1,
                offset: 0,
                messages: vec![m2],
            }
        );
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_distinct() {
        let (exchange, store, mut rx, author_id) = setup().await;

        let tasks: Vec<_> = (0..100)
            .map(|i| {
                let exchange = exchange.clone();
                tokio::spawn(async move {
                    exchange
                        .create_message(MessageType::Text, format!("msg {}", i), author_id)
                        .await
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for task in tasks {
            let message = task.await.unwrap().unwrap();
            assert!(ids.insert(message.id));
        }

        assert_eq!(store.count().await.unwrap(), 100);

        let mut published = 0;
        while let Ok(message) = rx.try_recv() {
            assert!(ids.contains(&message.id));
            published += 1;
        }
        assert_eq!(published, 100);
    }

    /// Holds every insert until `release` is notified
    struct GatedStore {
        inner: MemoryStore,
        entered: tokio::sync::Notify,
        release: tokio::sync::Notify,
    }

    #[async_trait]
    impl MessageStore for GatedStore {
        async fn insert(&self, message: NewMessage) -> Result<StoredMessage, StoreError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.insert(message).await
        }
        async fn get(&self, id: Uuid) -> Result<Option<Message>, StoreError> {
            self.inner.get(id).await
        }
        async fn list_window(&self, limit: i64, offset: i64) -> Result<Vec<Message>, StoreError> {
            self.inner.list_window(limit, offset).await
        }
        async fn count(&self) -> Result<i64, StoreError> {
            self.inner.count().await
        }
    }

    #[tokio::test]
    async fn test_create_survives_caller_cancellation() {
        let inner = MemoryStore::new();
        let author = inner
            .create_account(Uuid::new_v4(), "alice", "hash")
            .await
            .unwrap();
        let store = Arc::new(GatedStore {
            inner,
            entered: tokio::sync::Notify::new(),
            release: tokio::sync::Notify::new(),
        });
        let (publisher, mut rx) = HubPublisher::channel();
        let exchange = MessageExchange::new(store.clone(), publisher);

        let caller = tokio::spawn({
            let exchange = exchange.clone();
            async move {
                exchange
                    .create_message(MessageType::Text, "still here".to_string(), author.id)
                    .await
            }
        });

        store.entered.notified().await;
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());
        assert_eq!(store.count().await.unwrap(), 0);

        store.release.notify_one();

        let published = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(published.content, "still here");
        assert_eq!(published.author_id, author.id);
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(exchange.get_message(published.id).await.unwrap(), published);
    }
}
