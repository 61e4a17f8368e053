use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Client;

use crate::error::ScraperError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";

/// HTTP client for one extension's public store listing page.
///
/// Makes a single attempt per call; retry policy belongs to the caller,
/// which already has the cache to fall back on.
pub struct StoreClient {
    client: Client,
    store_url: String,
}

impl StoreClient {
    /// Creates a `StoreClient` for `store_url` with the given timeout and
    /// `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        store_url: impl Into<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            store_url: store_url.into(),
        })
    }

    #[must_use]
    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    /// Fetches the listing page and returns its body.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::UpstreamFetch`] on a non-2xx status, a
    /// network or timeout failure, or an unreadable body.
    pub async fn fetch_page(&self) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(&self.store_url)
            .header(ACCEPT, ACCEPT_HTML)
            .send()
            .await
            .map_err(|e| self.fetch_error(None, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UpstreamFetch {
                status: Some(status.as_u16()),
                url: self.store_url.clone(),
                reason: format!("unexpected status {status}"),
            });
        }

        response
            .text()
            .await
            .map_err(|e| self.fetch_error(Some(status.as_u16()), &e))
    }

    fn fetch_error(&self, status: Option<u16>, err: &reqwest::Error) -> ScraperError {
        ScraperError::UpstreamFetch {
            status,
            url: self.store_url.clone(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
