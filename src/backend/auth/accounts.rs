/**
 * Account Registration
 *
 * `AccountService::register` is idempotent for a given login/password pair:
 *
 * 1. New login → create the account with a bcrypt hash of the password
 * 2. Existing login → the password must verify against the stored hash
 *
 * Either way the caller gets back `Basic base64(login:hash)`, the credential
 * the identity resolver accepts.
 */
use std::sync::Arc;
use uuid::Uuid;

use super::resolver::basic_credential;
use super::RegistrationError;
use crate::backend::store::{Account, AccountStore, StoreError};
use crate::shared::SharedError;

#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>, bcrypt_cost: u32) -> Self {
        Self {
            accounts,
            bcrypt_cost,
        }
    }

    /// Register `login` (or log back in) and return its credential
    pub async fn register(&self, login: &str, password: &str) -> Result<String, RegistrationError> {
        if login.trim().is_empty() {
            return Err(SharedError::validation("login", "login must not be empty").into());
        }
        if login.contains(':') {
            return Err(SharedError::validation("login", "login must not contain ':'").into());
        }
        if password.is_empty() {
            return Err(SharedError::validation("password", "password must not be empty").into());
        }

        let account = match self.accounts.find_account_by_login(login).await? {
            Some(existing) => self.verify_existing(existing, password).await?,
            None => self.create(login, password).await?,
        };

        Ok(basic_credential(&account.login, &account.password_hash))
    }

    async fn create(&self, login: &str, password: &str) -> Result<Account, RegistrationError> {
        let cost = self.bcrypt_cost;
        let plain = password.to_string();
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
            .await
            .map_err(|e| RegistrationError::Hashing(e.to_string()))?
            .map_err(|e| RegistrationError::Hashing(e.to_string()))?;

        match self.accounts.create_account(Uuid::new_v4(), login, &hash).await {
            Ok(account) => {
                tracing::info!("[Auth] Registered account '{}' ({})", account.login, account.id);
                Ok(account)
            }
            // lost a race with a concurrent registration of the same login
            Err(StoreError::DuplicateLogin(_)) => {
                let existing = self
                    .accounts
                    .find_account_by_login(login)
                    .await?
                    .ok_or_else(|| {
                        StoreError::Inconsistent(format!("login '{}' vanished", login))
                    })?;
                self.verify_existing(existing, password).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn verify_existing(
        &self,
        account: Account,
        password: &str,
    ) -> Result<Account, RegistrationError> {
        let plain = password.to_string();
        let hash = account.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash))
            .await
            .map_err(|e| RegistrationError::Hashing(e.to_string()))?
            .map_err(|e| RegistrationError::Hashing(e.to_string()))?;

        if matches {
            Ok(account)
        } else {
            tracing::warn!("[Auth] Registration for existing '{}' with wrong password", account.login);
            Err(RegistrationError::PasswordMismatch)
        }
    }
}
