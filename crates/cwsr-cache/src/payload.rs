//! Typed access to cached [`ReviewsPayload`]s.
//!
//! Cache failures never fail a request: both helpers log and carry on.

use cwsr_core::ReviewsPayload;

use crate::{CacheError, CacheStore};

/// Reads and decodes the payload under `key`. Missing, expired, unreadable
/// and undecodable entries all come back as `None`.
pub async fn read_payload(store: &dyn CacheStore, key: &str) -> Option<ReviewsPayload> {
    match try_read(store, key).await {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(backend = store.name(), key, error = %e, "cache read failed");
            None
        }
    }
}

/// Encodes and stores `payload` under `key` for `ttl_secs` seconds. Returns
/// whether the write succeeded.
pub async fn write_payload(
    store: &dyn CacheStore,
    key: &str,
    payload: &ReviewsPayload,
    ttl_secs: u64,
) -> bool {
    match try_write(store, key, payload, ttl_secs).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(backend = store.name(), key, error = %e, "cache write failed");
            false
        }
    }
}

async fn try_read(store: &dyn CacheStore, key: &str) -> Result<Option<ReviewsPayload>, CacheError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    let payload = serde_json::from_str(&raw).map_err(|e| CacheError::Read {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Some(payload))
}

async fn try_write(
    store: &dyn CacheStore,
    key: &str,
    payload: &ReviewsPayload,
    ttl_secs: u64,
) -> Result<(), CacheError> {
    let raw = serde_json::to_string(payload)?;
    store.put(key, raw, ttl_secs).await
}
