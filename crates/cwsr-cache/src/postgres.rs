use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{CacheError, CacheStore};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Path relative to crates/cwsr-cache/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

/// Cache entries in the `cache_entries` table. Expired rows are filtered on
/// read and overwritten on the next `put`.
#[derive(Debug, Clone)]
pub struct PgCacheStore {
    pool: PgPool,
}

impl PgCacheStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to Postgres using an explicit URL and pool config.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Backend`] if the connection cannot be established.
    pub async fn connect(database_url: &str, config: PoolConfig) -> Result<Self, CacheError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Run all pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Migration`] if any migration fails.
    pub async fn migrate(&self) -> Result<(), CacheError> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    /// Send a `SELECT 1` to verify the pool has a live connection.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Backend`] if the query fails.
    pub async fn ping(&self) -> Result<(), CacheError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for PgCacheStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM cache_entries WHERE key = $1 AND expires_at > NOW()",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError> {
        sqlx::query(
            "INSERT INTO cache_entries (key, value, expires_at) \
             VALUES ($1, $2, NOW() + ($3::bigint * INTERVAL '1 second')) \
             ON CONFLICT (key) DO UPDATE \
             SET value = EXCLUDED.value, expires_at = EXCLUDED.expires_at",
        )
        .bind(key)
        .bind(value)
        .bind(ttl_seconds(ttl_secs))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// TTL as a Postgres `bigint`, saturating at `i64::MAX`.
fn ttl_seconds(ttl_secs: u64) -> i64 {
    i64::try_from(ttl_secs).unwrap_or(i64::MAX)
}
