/**
 * Server Configuration
 *
 * Loading and validation of server settings, plus the optional PostgreSQL
 * connection.
 *
 * # Configuration Sources
 *
 * Settings come from environment variables (a `.env` file is loaded by the
 * binary first), with defaults for local development:
 *
 * | variable            | default       |
 * |---------------------|---------------|
 * | `SERVER_PORT`       | `3000`        |
 * | `DATABASE_URL`      | unset         |
 * | `UPLOAD_DIR`        | `uploads`     |
 * | `ALLOWED_ORIGIN`    | any origin    |
 * | `BCRYPT_COST`       | `12`          |
 * | `SUBSCRIBER_BUFFER` | `64`          |
 * | `MAX_UPLOAD_BYTES`  | `104857600`   |
 *
 * # Error Handling
 *
 * A malformed value is a `ConfigError`. Leaving `DATABASE_URL` unset selects
 * the in-memory store. Once it is set, a database that cannot be reached or
 * migrated is a `ConfigError::Database` and startup fails.
 */
use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::backend::realtime::hub::DEFAULT_SUBSCRIBER_BUFFER;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

const DATABASE_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("{key} is out of range: {message}")]
    OutOfRange { key: &'static str, message: String },

    /// `DATABASE_URL` is set but the database is unusable
    #[error("Database unavailable: {0}")]
    Database(String),
}

/// Validated server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub upload_dir: PathBuf,
    /// `None` allows any origin
    pub allowed_origin: Option<String>,
    pub bcrypt_cost: u32,
    /// Per-connection queue depth in the notification hub
    pub subscriber_buffer: usize,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            allowed_origin: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(port) = lookup("SERVER_PORT") {
            builder = builder.port(parse_value("SERVER_PORT", &port)?);
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            builder = builder.database_url(url);
        }
        if let Some(dir) = lookup("UPLOAD_DIR").filter(|dir| !dir.trim().is_empty()) {
            builder = builder.upload_dir(dir);
        }
        if let Some(origin) = lookup("ALLOWED_ORIGIN").filter(|o| !o.trim().is_empty()) {
            builder = builder.allowed_origin(origin);
        }
        if let Some(cost) = lookup("BCRYPT_COST") {
            builder = builder.bcrypt_cost(parse_value("BCRYPT_COST", &cost)?);
        }
        if let Some(buffer) = lookup("SUBSCRIBER_BUFFER") {
            builder = builder.subscriber_buffer(parse_value("SUBSCRIBER_BUFFER", &buffer)?);
        }
        if let Some(max) = lookup("MAX_UPLOAD_BYTES") {
            builder = builder.max_upload_bytes(parse_value("MAX_UPLOAD_BYTES", &max)?);
        }

        builder.build()
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

/// Builder for `ServerConfig`, validated on `build`
#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.upload_dir = dir.into();
        self
    }

    pub fn allowed_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.allowed_origin = Some(origin.into());
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.config.bcrypt_cost = cost;
        self
    }

    pub fn subscriber_buffer(mut self, buffer: usize) -> Self {
        self.config.subscriber_buffer = buffer;
        self
    }

    pub fn max_upload_bytes(mut self, max: usize) -> Self {
        self.config.max_upload_bytes = max;
        self
    }

    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let config = self.config;

        if !(4..=31).contains(&config.bcrypt_cost) {
            return Err(ConfigError::OutOfRange {
                key: "BCRYPT_COST",
                message: format!("{} is not within 4..=31", config.bcrypt_cost),
            });
        }
        if config.subscriber_buffer == 0 {
            return Err(ConfigError::OutOfRange {
                key: "SUBSCRIBER_BUFFER",
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(origin) = &config.allowed_origin {
            if HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::InvalidValue {
                    key: "ALLOWED_ORIGIN",
                    value: origin.clone(),
                });
            }
        }

        Ok(config)
    }
}

/// Connect to PostgreSQL and run migrations
///
/// # Returns
///
/// - `Ok(Some(PgPool))` if the database is configured and ready
/// - `Ok(None)` if `DATABASE_URL` is not set
/// - `Err(ConfigError::Database)` if the connection or the migrations fail
pub async fn load_database(config: &ServerConfig) -> Result<Option<PgPool>, ConfigError> {
    let database_url = match &config.database_url {
        Some(url) => url,
        None => {
            tracing::warn!("[Config] DATABASE_URL not set. Messages will be kept in memory.");
            return Ok(None);
        }
    };

    tracing::info!("[Config] Connecting to database...");

    let pool = PgPoolOptions::new()
        .acquire_timeout(DATABASE_CONNECT_TIMEOUT)
        .connect(database_url)
        .await
        .map_err(|e| {
            tracing::error!("[Config] Failed to create database connection pool: {:?}", e);
            ConfigError::Database(e.to_string())
        })?;

    tracing::info!("[Config] Running database migrations...");
    sqlx::migrate!().run(&pool).await.map_err(|e| {
        tracing::error!("[Config] Failed to run database migrations: {}", e);
        ConfigError::Database(e.to_string())
    })?;
    tracing::info!("[Config] Database migrations completed");

    Ok(Some(pool))
}
