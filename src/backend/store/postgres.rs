/**
 * Postgres Store
 *
 * Database operations for accounts and messages, backed by `sqlx::PgPool`.
 * The schema lives in `migrations/` and is applied at start-up by
 * `server::config::load_database`.
 *
 * # Ordering
 *
 * `created_at` defaults to `clock_timestamp()` and the `seq` BIGSERIAL column
 * breaks ties, so `ORDER BY created_at DESC, seq DESC` is the newest-first
 * history in insertion order.
 *
 * # Error Mapping
 *
 * Constraint violations are translated into the matching `StoreError`
 * variants; everything else is passed through as `StoreError::Database`.
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{Account, AccountStore, MessageStore, NewMessage, StoreError, StoredMessage};
use crate::shared::{Message, MessageType};

const MESSAGE_COLUMNS: &str =
    "m.id, m.message_type, m.content, m.is_changed, m.author_id, m.created_at, m.updated_at, a.login AS author_login";

#[derive(sqlx::FromRow)]
struct StoredMessageRow {
    id: Uuid,
    message_type: String,
    content: String,
    is_changed: bool,
    author_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StoredMessageRow> for StoredMessage {
    type Error = StoreError;

    fn try_from(row: StoredMessageRow) -> Result<Self, Self::Error> {
        let message_type = row
            .message_type
            .parse::<MessageType>()
            .map_err(|_| StoreError::UnsupportedType(row.message_type.clone()))?;

        Ok(StoredMessage {
            id: row.id,
            message_type,
            content: row.content,
            is_changed: row.is_changed,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct JoinedMessageRow {
    #[sqlx(flatten)]
    message: StoredMessageRow,
    author_login: String,
}

impl TryFrom<JoinedMessageRow> for Message {
    type Error = StoreError;

    fn try_from(row: JoinedMessageRow) -> Result<Self, Self::Error> {
        let stored = StoredMessage::try_from(row.message)?;
        Ok(stored.with_author(row.author_login))
    }
}

/// Store backed by a Postgres connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(err: sqlx::Error, message_id: Uuid, author_id: Uuid) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return StoreError::UnknownAuthor(author_id);
        }
        if db_err.is_unique_violation() {
            return StoreError::DuplicateId(message_id);
        }
    }
    StoreError::Database(err)
}

fn map_account_error(err: sqlx::Error, login: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateLogin(login.to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert(&self, message: NewMessage) -> Result<StoredMessage, StoreError> {
        let row = sqlx::query_as::<_, StoredMessageRow>(
            r#"
            INSERT INTO messages (id, message_type, content, is_changed, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, message_type, content, is_changed, author_id, created_at, updated_at
            "#,
        )
        .bind(message.id)
        .bind(message.message_type.as_str())
        .bind(&message.content)
        .bind(message.is_changed)
        .bind(message.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, message.id, message.author_id))?;

        tracing::debug!("[Store] Inserted message {}", row.id);
        StoredMessage::try_from(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Message>, StoreError> {
        let sql = format!(
            "SELECT {} FROM messages m JOIN accounts a ON a.id = m.author_id WHERE m.id = $1",
            MESSAGE_COLUMNS
        );
        let row = sqlx::query_as::<_, JoinedMessageRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Message::try_from).transpose()
    }

    async fn list_window(&self, limit: i64, offset: i64) -> Result<Vec<Message>, StoreError> {
        let sql = format!(
            "SELECT {} FROM messages m JOIN accounts a ON a.id = m.author_id \
             ORDER BY m.created_at DESC, m.seq DESC LIMIT $1 OFFSET $2",
            MESSAGE_COLUMNS
        );
        let rows = sqlx::query_as::<_, JoinedMessageRow>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Message::try_from).collect()
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_account(
        &self,
        id: Uuid,
        login: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError> {
        let now = Utc::now();

        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, login, password, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, login, password AS password_hash, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(login)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_account_error(e, login))
    }

    async fn find_account_by_login(&self, login: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, login, password AS password_hash, created_at, updated_at
            FROM accounts
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_account_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, login, password AS password_hash, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }
}
