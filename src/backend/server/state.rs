/**
 * Application State Management
 *
 * `AppState` is the router state. The `FromRef` implementations let handlers
 * and middleware extract just the part they need, e.g.
 * `State<MessageExchange>` or `State<Arc<NotificationHub>>`.
 *
 * # Contents
 *
 * - `exchange` - the message exchange core
 * - `hub` - the notification hub that realtime connections register with
 * - `accounts` - account registration
 * - `resolver` - identity resolution for the auth middleware
 * - `blobs` - file message storage
 * - `config` - validated settings
 *
 * Everything is cheap to clone (`Arc`s or handles holding them).
 */
use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::{AccountService, IdentityResolver};
use crate::backend::blob::BlobStore;
use crate::backend::exchange::MessageExchange;
use crate::backend::realtime::NotificationHub;
use crate::backend::server::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub exchange: MessageExchange,
    pub hub: Arc<NotificationHub>,
    pub accounts: AccountService,
    pub resolver: Arc<dyn IdentityResolver>,
    pub blobs: Arc<dyn BlobStore>,
    pub config: Arc<ServerConfig>,
}

impl FromRef<AppState> for MessageExchange {
    fn from_ref(state: &AppState) -> Self {
        state.exchange.clone()
    }
}

impl FromRef<AppState> for Arc<NotificationHub> {
    fn from_ref(state: &AppState) -> Self {
        state.hub.clone()
    }
}

impl FromRef<AppState> for AccountService {
    fn from_ref(state: &AppState) -> Self {
        state.accounts.clone()
    }
}

impl FromRef<AppState> for Arc<dyn IdentityResolver> {
    fn from_ref(state: &AppState) -> Self {
        state.resolver.clone()
    }
}

impl FromRef<AppState> for Arc<dyn BlobStore> {
    fn from_ref(state: &AppState) -> Self {
        state.blobs.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
