//! Review payload types shared by the scraper, cache, and server crates.
//!
//! Field names serialize in camelCase because the rendering client consumes
//! the payload as-is (`extensionId`, `storeUrl`, `fetchedAt`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate rating figures for the product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Average rating on a 0-5 scale, rounded to one decimal.
    #[serde(default)]
    pub avg: f64,
    /// Number of ratings or reviews reported by the store.
    #[serde(default)]
    pub count: u64,
    /// Number of users reported by the store.
    #[serde(default)]
    pub users: u64,
}

/// Origin tag attached to every review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewSource {
    /// Chrome Web Store product page.
    #[default]
    Cws,
}

/// A normalized user review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Star rating, always within `1..=5`.
    pub stars: u8,
    /// Calendar day in `YYYY-MM-DD` form.
    pub date: String,
    /// Plain review text without markup, at most 600 characters.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default)]
    pub source: ReviewSource,
}

/// The unit served to clients and persisted in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsPayload {
    pub extension_id: String,
    pub store_url: String,
    pub fetched_at: DateTime<Utc>,
    pub rating: Metrics,
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Set only when the payload is served from cache after a failed refresh.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stale: bool,
}

impl ReviewsPayload {
    /// Marks a previously cached payload as stale.
    #[must_use]
    pub fn into_stale(self) -> Self {
        Self {
            stale: true,
            ..self
        }
    }
}
