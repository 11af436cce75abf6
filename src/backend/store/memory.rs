/**
 * In-memory Store
 *
 * Keeps accounts and messages in process memory behind a single
 * `tokio::sync::RwLock`. It enforces the same constraints as the Postgres
 * schema (unique message id, unique login, author must exist) so that code
 * running against it behaves like production.
 *
 * `created_at` is clamped to be non-decreasing in insertion order, which makes
 * the reverse of the insertion sequence exactly the newest-first history.
 */
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Account, AccountStore, MessageStore, NewMessage, StoreError, StoredMessage};
use crate::shared::Message;

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<Uuid, Account>,
    logins: HashMap<String, Uuid>,
    // insertion order
    messages: Vec<StoredMessage>,
    positions: HashMap<Uuid, usize>,
}

impl MemoryState {
    fn join(&self, row: &StoredMessage) -> Result<Message, StoreError> {
        let account = self.accounts.get(&row.author_id).ok_or_else(|| {
            StoreError::Inconsistent(format!(
                "message {} references missing author {}",
                row.id, row.author_id
            ))
        })?;
        Ok(row.clone().with_author(account.login.clone()))
    }
}

/// Process-local store for development and tests
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert(&self, message: NewMessage) -> Result<StoredMessage, StoreError> {
        let mut state = self.state.write().await;

        if state.positions.contains_key(&message.id) {
            return Err(StoreError::DuplicateId(message.id));
        }
        if !state.accounts.contains_key(&message.author_id) {
            return Err(StoreError::UnknownAuthor(message.author_id));
        }

        let mut created_at = Utc::now();
        if let Some(last) = state.messages.last() {
            if last.created_at > created_at {
                created_at = last.created_at;
            }
        }

        let stored = StoredMessage {
            id: message.id,
            message_type: message.message_type,
            content: message.content,
            is_changed: message.is_changed,
            author_id: message.author_id,
            created_at,
            updated_at: created_at,
        };

        let position = state.messages.len();
        state.positions.insert(stored.id, position);
        state.messages.push(stored.clone());

        tracing::debug!("[Store] Inserted message {} at position {}", stored.id, position);
        Ok(stored)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Message>, StoreError> {
        let state = self.state.read().await;
        match state.positions.get(&id) {
            Some(&position) => state.join(&state.messages[position]).map(Some),
            None => Ok(None),
        }
    }

    async fn list_window(&self, limit: i64, offset: i64) -> Result<Vec<Message>, StoreError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let offset = usize::try_from(offset).unwrap_or(0);

        let state = self.state.read().await;
        state
            .messages
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .map(|row| state.join(row))
            .collect()
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let state = self.state.read().await;
        Ok(state.messages.len() as i64)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(
        &self,
        id: Uuid,
        login: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError> {
        let mut state = self.state.write().await;

        if state.logins.contains_key(login) {
            return Err(StoreError::DuplicateLogin(login.to_string()));
        }

        let now = Utc::now();
        let account = Account {
            id,
            login: login.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.logins.insert(account.login.clone(), id);
        state.accounts.insert(id, account.clone());

        Ok(account)
    }

    async fn find_account_by_login(&self, login: &str) -> Result<Option<Account>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .logins
            .get(login)
            .and_then(|id| state.accounts.get(id))
            .cloned())
    }

    async fn find_account_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let state = self.state.read().await;
        Ok(state.accounts.get(&id).cloned())
    }
}
