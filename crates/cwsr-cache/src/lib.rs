//! TTL key-value storage for the last good reviews payload.
//!
//! [`CacheStore`] is the seam: the server holds an `Arc<dyn CacheStore>` and
//! does not care whether entries live in process memory or in Postgres.

mod memory;
mod payload;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryCacheStore;
pub use payload::{read_payload, write_payload};
pub use postgres::{PgCacheStore, PoolConfig};

#[derive(Debug, Error)]
pub enum CacheError {
    /// A stored value could not be decoded.
    #[error("cache read failed for {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("payload serialization failed: {0}")]
    PayloadSerialization(#[from] serde_json::Error),

    #[error(transparent)]
    Backend(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// String key-value store where every entry carries a time-to-live.
///
/// An entry whose TTL has elapsed must not be returned by [`get`](Self::get).
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, replacing any previous entry, for
    /// `ttl_secs` seconds.
    async fn put(&self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError>;
}
