//! Identity of the single upstream product tracked per deployment.

/// The upstream extension whose store page is scraped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductIdentity {
    pub extension_id: String,
    pub slug: String,
    /// Store origin, e.g. `https://chromewebstore.google.com`.
    pub base_url: String,
}

impl ProductIdentity {
    /// Public product page: `{base}/detail/{slug}/{id}`.
    #[must_use]
    pub fn store_url(&self) -> String {
        format!(
            "{}/detail/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.slug,
            self.extension_id
        )
    }

    /// Cache key under which the last good payload is stored.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("reviews:{}", self.extension_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(base_url: &str) -> ProductIdentity {
        ProductIdentity {
            extension_id: "abcdefghijklmnopabcdefghijklmn".to_string(),
            slug: "anime-episode-tracker".to_string(),
            base_url: base_url.to_string(),
        }
    }

    #[test]
    fn store_url_joins_slug_and_id() {
        assert_eq!(
            identity("https://chromewebstore.google.com").store_url(),
            "https://chromewebstore.google.com/detail/anime-episode-tracker/abcdefghijklmnopabcdefghijklmn"
        );
    }

    #[test]
    fn store_url_strips_trailing_slash() {
        assert_eq!(
            identity("http://127.0.0.1:9999/").store_url(),
            "http://127.0.0.1:9999/detail/anime-episode-tracker/abcdefghijklmnopabcdefghijklmn"
        );
    }

    #[test]
    fn cache_key_is_prefixed_with_reviews() {
        assert_eq!(
            identity("https://chromewebstore.google.com").cache_key(),
            "reviews:abcdefghijklmnopabcdefghijklmn"
        );
    }
}
