/**
 * Server Initialization
 *
 * Builds the application from a `ServerConfig`.
 *
 * # Initialization Process
 *
 * 1. Connect to PostgreSQL if configured, otherwise use the in-memory store
 * 2. Create the notification hub and spawn its dispatcher task
 * 3. Wire the exchange, account service, identity resolver and blob store
 *    into `AppState`
 * 4. Create the router
 *
 * Without `DATABASE_URL` the history lives in memory and is lost on restart.
 * A configured database that cannot be reached fails `create_app`.
 */
use axum::Router;
use std::sync::Arc;

use crate::backend::auth::{AccountService, BasicAuthResolver};
use crate::backend::blob::FsBlobStore;
use crate::backend::exchange::MessageExchange;
use crate::backend::realtime::{spawn_dispatcher, NotificationHub};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ConfigError, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::store::{AccountStore, MemoryStore, MessageStore, PgStore};

/// Create and configure the Axum application
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, ConfigError> {
    tracing::info!("[Init] Initializing roomlog server");

    let state = match load_database(&config).await? {
        Some(pool) => {
            tracing::info!("[Init] Using PostgreSQL message store");
            assemble_state(config, Arc::new(PgStore::new(pool)))
        }
        None => {
            tracing::warn!("[Init] Using in-memory message store");
            assemble_state(config, Arc::new(MemoryStore::new()))
        }
    };

    let app = create_router(state);
    tracing::info!("[Init] Router configured");
    Ok(app)
}

/// Wire every service around `store`
///
/// Spawns the hub dispatcher, so it must run inside a Tokio runtime.
pub fn assemble_state<S>(config: ServerConfig, store: Arc<S>) -> AppState
where
    S: MessageStore + AccountStore + 'static,
{
    let hub = Arc::new(NotificationHub::new(config.subscriber_buffer));
    let (publisher, _dispatcher) = spawn_dispatcher(hub.clone());

    let message_store: Arc<dyn MessageStore> = store.clone();
    let account_store: Arc<dyn AccountStore> = store;

    AppState {
        exchange: MessageExchange::new(message_store, publisher),
        hub,
        accounts: AccountService::new(account_store.clone(), config.bcrypt_cost),
        resolver: Arc::new(BasicAuthResolver::new(account_store)),
        blobs: Arc::new(FsBlobStore::new(config.upload_dir.clone())),
        config: Arc::new(config),
    }
}
