//! Environment-driven configuration for the `PostgreSQL` store.

use crate::store::adapters::postgres::{PostgresTreeStore, TreePgPool};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;

/// Primary variable naming the database URL.
pub const DATABASE_URL_VAR: &str = "TRELLIS_DATABASE_URL";
/// Fallback variable naming the database URL.
pub const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Variable naming the maximum pool size.
pub const POOL_SIZE_VAR: &str = "TRELLIS_DB_POOL_SIZE";
/// Pool size used when [`POOL_SIZE_VAR`] is unset.
pub const DEFAULT_POOL_SIZE: u32 = 8;

/// Errors raised while loading configuration or connecting.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither database URL variable is set.
    #[error("{DATABASE_URL_VAR} or {FALLBACK_DATABASE_URL_VAR} must be set")]
    MissingDatabaseUrl,

    /// The pool size is not a positive integer.
    #[error("invalid {POOL_SIZE_VAR} value: {0:?}")]
    InvalidPoolSize(String),

    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
}

/// Connection settings for [`PostgresTreeStore`].
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    database_url: String,
    pool_size: u32,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("database_url", &"<redacted>")
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

impl StoreConfig {
    /// Creates a configuration with the default pool size.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    /// Overrides the pool size.
    #[must_use]
    pub const fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when no URL is set and
    /// [`ConfigError::InvalidPoolSize`] for a malformed pool size.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup(DATABASE_URL_VAR)
            .or_else(|| lookup(FALLBACK_DATABASE_URL_VAR))
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let pool_size = match lookup(POOL_SIZE_VAR) {
            None => DEFAULT_POOL_SIZE,
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPoolSize(raw))?,
        };

        Ok(Self::new(database_url).with_pool_size(pool_size))
    }

    /// Returns the database URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the maximum pool size.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }

    /// Builds the connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when the pool cannot establish its
    /// initial connections.
    pub fn build_pool(&self) -> Result<TreePgPool, ConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(self.database_url.clone());
        let pool = Pool::builder().max_size(self.pool_size).build(manager)?;
        tracing::info!(pool_size = self.pool_size, "database pool ready");
        Ok(pool)
    }

    /// Builds a [`PostgresTreeStore`] over a fresh pool.
    ///
    /// # Errors
    ///
    /// Same as [`Self::build_pool`].
    pub fn connect(&self) -> Result<PostgresTreeStore, ConfigError> {
        Ok(PostgresTreeStore::new(self.build_pool()?))
    }
}
