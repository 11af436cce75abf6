//! Store Module
//!
//! Durable state of the chat room: the accounts that author messages and the
//! message table itself. The store is a dumb persistence layer. Ids are
//! assigned by its callers, timestamps are assigned here.
//!
//! # Architecture
//!
//! - **`MessageStore`** - insert, point lookup and paginated, newest-first
//!   listing of messages, each read joined with the author's `{id, login}`
//! - **`AccountStore`** - account creation and lookup for the identity
//!   resolver and registration handler
//!
//! Two implementations are provided:
//!
//! - **`postgres`** - `PgStore`, backed by `sqlx::PgPool` and the schema in
//!   `migrations/`
//! - **`memory`** - `MemoryStore`, used when no `DATABASE_URL` is configured
//!   and throughout the test suite
//!
//! # Ordering
//!
//! History order is `created_at` descending with ties broken by insertion
//! order, newest first. Both implementations agree on it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::shared::{Author, Message, MessageType};

/// Postgres-backed store
pub mod postgres;

/// In-memory store
pub mod memory;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors raised by a store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// A message with this id already exists
    #[error("Message {0} already exists")]
    DuplicateId(Uuid),

    /// The author id does not reference an existing account
    #[error("Author {0} does not exist")]
    UnknownAuthor(Uuid),

    /// An account with this login already exists
    #[error("Login '{0}' is already taken")]
    DuplicateLogin(String),

    /// A stored row carries a message type this build does not know
    #[error("Unsupported message type '{0}'")]
    UnsupportedType(String),

    /// The store contradicted itself (e.g. a row vanished right after insert)
    #[error("Inconsistent store state: {0}")]
    Inconsistent(String),

    /// Storage unreachable or any other database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A fully formed message ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub id: Uuid,
    pub message_type: MessageType,
    pub content: String,
    pub is_changed: bool,
    pub author_id: Uuid,
}

/// A message row as written, before the author join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: Uuid,
    pub message_type: MessageType,
    pub content: String,
    pub is_changed: bool,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredMessage {
    /// Join the row with its author's public projection
    pub fn with_author(self, login: impl Into<String>) -> Message {
        Message {
            id: self.id,
            message_type: self.message_type,
            content: self.content,
            is_changed: self.is_changed,
            author_id: self.author_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            author: Author {
                id: self.author_id,
                login: login.into(),
            },
        }
    }
}

/// One window of the history plus the independently counted total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageListing {
    pub messages: Vec<Message>,
    pub total: i64,
}

/// Account record, including the bcrypt password hash
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub login: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persistence for chat messages
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Write a message durably and return it with its assigned timestamps
    ///
    /// # Errors
    ///
    /// * `StoreError::DuplicateId` - the id is already taken
    /// * `StoreError::UnknownAuthor` - `author_id` references no account
    /// * `StoreError::Database` - storage unreachable
    async fn insert(&self, message: NewMessage) -> Result<StoredMessage, StoreError>;

    /// Point lookup joined with the author
    async fn get(&self, id: Uuid) -> Result<Option<Message>, StoreError>;

    /// Up to `limit` messages, newest first, skipping `offset`
    async fn list_window(&self, limit: i64, offset: i64) -> Result<Vec<Message>, StoreError>;

    /// Total number of stored messages
    async fn count(&self) -> Result<i64, StoreError>;

    /// Window plus total. The two reads are separate and not transactionally
    /// consistent with concurrent inserts.
    async fn list(&self, limit: i64, offset: i64) -> Result<MessageListing, StoreError> {
        let messages = self.list_window(limit, offset).await?;
        let total = self.count().await?;
        Ok(MessageListing { messages, total })
    }
}

/// Persistence for accounts
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create an account. `password_hash` must already be hashed.
    async fn create_account(
        &self,
        id: Uuid,
        login: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError>;

    async fn find_account_by_login(&self, login: &str) -> Result<Option<Account>, StoreError>;

    async fn find_account_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;
}
