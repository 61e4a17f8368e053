use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response or network failure while fetching the store page.
    /// `status` is `None` when no response was received.
    #[error("upstream fetch failed for {url}: {reason}")]
    UpstreamFetch {
        status: Option<u16>,
        url: String,
        reason: String,
    },

    /// No extractor produced a finite average rating.
    #[error("store page yielded no usable average rating")]
    MetricsMissing,
}
