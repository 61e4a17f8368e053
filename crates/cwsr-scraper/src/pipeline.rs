//! One full refresh: fetch, parse, select, assemble.

use chrono::{DateTime, Utc};
use cwsr_core::{Metrics, ProductIdentity, Review, ReviewsPayload};

use crate::client::StoreClient;
use crate::error::ScraperError;
use crate::parse::parse_store_page;
use crate::select::pick_top_reviews;

/// How many reviews to publish and how far back "recent" reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSettings {
    pub window_days: u32,
    pub count: usize,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            window_days: 7,
            count: 3,
        }
    }
}

/// Fetches the store page and builds a fresh payload.
///
/// # Errors
///
/// - [`ScraperError::UpstreamFetch`] if the page could not be fetched.
/// - [`ScraperError::MetricsMissing`] if the page carries no usable rating.
pub async fn collect_payload(
    client: &StoreClient,
    product: &ProductIdentity,
    selection: SelectionSettings,
) -> Result<ReviewsPayload, ScraperError> {
    let html = client.fetch_page().await?;
    let page = parse_store_page(&html)?;
    if !page.metrics.avg.is_finite() {
        return Err(ScraperError::MetricsMissing);
    }

    let reviews = pick_top_reviews(&page.reviews, selection.window_days, selection.count);
    tracing::info!(
        extension_id = %product.extension_id,
        avg = page.metrics.avg,
        parsed = page.reviews.len(),
        selected = reviews.len(),
        "store page parsed"
    );

    Ok(build_payload(product, page.metrics, reviews, Utc::now()))
}

/// Assembles the payload served to clients.
#[must_use]
pub fn build_payload(
    product: &ProductIdentity,
    rating: Metrics,
    reviews: Vec<Review>,
    fetched_at: DateTime<Utc>,
) -> ReviewsPayload {
    ReviewsPayload {
        extension_id: product.extension_id.clone(),
        store_url: product.store_url(),
        fetched_at,
        rating,
        reviews,
        stale: false,
    }
}
