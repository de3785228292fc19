//! Connection handling for the relational store.
//!
//! Uses [`sqlx`] with runtime query construction (not compile-time
//! checked) so no live database is needed at build time. All value
//! parameters are bound; table names are validated identifiers before
//! they are interpolated into SQL text.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::{PipelineError, Result};

/// Default maximum number of connections in the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default connection acquire timeout in seconds.
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Configuration for the store connection pool.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database URL, e.g. `sqlite://weather.db` or `sqlite::memory:`.
    pub url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Timeout for acquiring a connection.
    pub acquire_timeout: Duration,
}

impl StoreConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    #[must_use]
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

/// Handle to the relational store.
///
/// Wraps a [`SqlitePool`]; the per-table stores borrow the pool from
/// here. Dropping the handle closes the pool when the last clone goes.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect using the provided configuration.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let connect_options =
            SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(connect_options)
            .await?;

        tracing::info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Connected to store"
        );

        Ok(Self { pool })
    }

    /// Connect using a database URL with default pool settings.
    pub async fn connect_url(url: &str) -> Result<Self> {
        Self::connect(&StoreConfig::new(url)).await
    }

    /// Open a private in-memory database (single connection, since each
    /// SQLite in-memory connection is its own database).
    pub async fn connect_in_memory() -> Result<Self> {
        Self::connect(&StoreConfig::new("sqlite::memory:").with_max_connections(1)).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the raw-observations and stats tables if they do not exist.
    ///
    /// This is the explicit schema setup invoked by `init-db` (and by
    /// tests). The write paths never create schema themselves.
    pub async fn ensure_schema(&self, raw_table: &str, stats_table: &str) -> Result<()> {
        validate_table_name(raw_table)?;
        validate_table_name(stats_table)?;

        let raw_sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                station_id TEXT NOT NULL,
                date TEXT NOT NULL,
                max_temp INTEGER,
                min_temp INTEGER,
                precipitation INTEGER
            )",
            raw_table
        );
        sqlx::query(&raw_sql).execute(&self.pool).await?;

        let stats_sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                station_id TEXT NOT NULL,
                year INTEGER NOT NULL,
                avg_max_temp REAL,
                avg_min_temp REAL,
                total_precipitation REAL
            )",
            stats_table
        );
        sqlx::query(&stats_sql).execute(&self.pool).await?;

        tracing::info!(raw_table, stats_table, "Schema ensured");
        Ok(())
    }

    /// Close all connections in the pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Reject anything that is not a bare SQL identifier before it reaches
/// SQL text. Value parameters are always bound; this covers the one
/// thing that cannot be.
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(PipelineError::Config(format!(
            "Invalid table name: {:?}",
            name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_table_name() {
        assert!(validate_table_name("weather_data").is_ok());
        assert!(validate_table_name("_t2").is_ok());

        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("2fast").is_err());
        assert!(validate_table_name("weather-data").is_err());
        assert!(validate_table_name("weather data; DROP TABLE x").is_err());
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        db.ensure_schema("weather_data", "weather_stats").await.unwrap();
        db.ensure_schema("weather_data", "weather_stats").await.unwrap();

        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('weather_data', 'weather_stats')")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(count.0, 2);
    }

    #[tokio::test]
    async fn test_ensure_schema_rejects_bad_identifiers() {
        let db = Database::connect_in_memory().await.unwrap();
        let err = db
            .ensure_schema("weather data", "weather_stats")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
