//! Store configuration read from the process environment.
//!
//! A `.env` file in the working directory is loaded first when present;
//! variables already set in the environment win.
//!
//! | Variable                       | Default          |
//! |--------------------------------|------------------|
//! | `STAGEBOARD_DATABASE_URL`      | `DATABASE_URL`   |
//! | `STAGEBOARD_POOL_MAX_SIZE`     | `8`              |
//! | `STAGEBOARD_POOL_TIMEOUT_SECS` | `30`             |

use std::fmt;
use std::num::ParseIntError;
use std::time::Duration;

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;
use tracing::debug;

use crate::postgres::PgPool;

/// Preferred variable holding the database URL.
pub const DATABASE_URL_VAR: &str = "STAGEBOARD_DATABASE_URL";
/// Fallback variable holding the database URL.
pub const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Variable holding the maximum pool size.
pub const POOL_MAX_SIZE_VAR: &str = "STAGEBOARD_POOL_MAX_SIZE";
/// Variable holding the pool checkout timeout in seconds.
pub const POOL_TIMEOUT_VAR: &str = "STAGEBOARD_POOL_TIMEOUT_SECS";

const DEFAULT_POOL_MAX_SIZE: u32 = 8;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading configuration or opening the pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither database URL variable is set.
    #[error("STAGEBOARD_DATABASE_URL or DATABASE_URL must be set")]
    MissingDatabaseUrl,

    /// A numeric variable could not be parsed.
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// Raw value found.
        value: String,
        /// Parse failure.
        source: ParseIntError,
    },

    /// The pool size is zero.
    #[error("STAGEBOARD_POOL_MAX_SIZE must be at least 1")]
    ZeroPoolSize,

    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
}

/// Connection settings for the `PostgreSQL` store.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    database_url: String,
    pool_max_size: u32,
    pool_timeout: Duration,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("database_url", &"<redacted>")
            .field("pool_max_size", &self.pool_max_size)
            .field("pool_timeout", &self.pool_timeout)
            .finish()
    }
}

impl StoreConfig {
    /// Creates a configuration with default pool settings.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
            pool_timeout: Duration::from_secs(DEFAULT_POOL_TIMEOUT_SECS),
        }
    }

    /// Overrides the maximum pool size.
    #[must_use]
    pub const fn with_pool_max_size(mut self, size: u32) -> Self {
        self.pool_max_size = size;
        self
    }

    /// Overrides the pool checkout timeout.
    #[must_use]
    pub const fn with_pool_timeout(mut self, timeout: Duration) -> Self {
        self.pool_timeout = timeout;
        self
    }

    /// Loads configuration from `.env` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the database URL is missing or a numeric
    /// variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded environment file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the database URL is missing or a numeric
    /// variable is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = read(DATABASE_URL_VAR)
            .or_else(|| read(FALLBACK_DATABASE_URL_VAR))
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        let pool_max_size = match read(POOL_MAX_SIZE_VAR) {
            Some(raw) => parse_number(POOL_MAX_SIZE_VAR, &raw)?,
            None => DEFAULT_POOL_MAX_SIZE,
        };
        if pool_max_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }

        let timeout_secs = match read(POOL_TIMEOUT_VAR) {
            Some(raw) => parse_number(POOL_TIMEOUT_VAR, &raw)?,
            None => DEFAULT_POOL_TIMEOUT_SECS,
        };

        Ok(Self::new(database_url)
            .with_pool_max_size(pool_max_size)
            .with_pool_timeout(Duration::from_secs(timeout_secs)))
    }

    /// Returns the database URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the maximum pool size.
    #[must_use]
    pub const fn pool_max_size(&self) -> u32 {
        self.pool_max_size
    }

    /// Returns the pool checkout timeout.
    #[must_use]
    pub const fn pool_timeout(&self) -> Duration {
        self.pool_timeout
    }

    /// Opens an r2d2 connection pool with these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when no connection can be established
    /// within the timeout.
    pub fn build_pool(&self) -> Result<PgPool, ConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(&self.database_url);
        let pool = Pool::builder()
            .max_size(self.pool_max_size)
            .connection_timeout(self.pool_timeout)
            .build(manager)?;
        debug!(max_size = self.pool_max_size, "connection pool ready");
        Ok(pool)
    }
}

fn parse_number<N>(var: &'static str, raw: &str) -> Result<N, ConfigError>
where
    N: std::str::FromStr<Err = ParseIntError>,
{
    raw.trim()
        .parse()
        .map_err(|source| ConfigError::InvalidNumber {
            var,
            value: raw.to_owned(),
            source,
        })
}
