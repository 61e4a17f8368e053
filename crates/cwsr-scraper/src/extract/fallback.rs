//! Tier 3: pattern scan of the rendered markup.
//!
//! Used when neither structured source carried the data. The class names
//! below are the store's generated CSS hooks and will drift; keep the
//! patterns here so they are easy to update.

use std::sync::LazyLock;

use regex::Regex;

use super::{Extraction, Extractor, PartialMetrics, ReviewCandidate};
use crate::coerce::{clamp_stars, to_number};
use crate::sanitize::sanitize_text;

static AVG_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-5](?:[\.,][0-9])?)\s*(?:stars?|étoiles?)").expect("valid avg text regex")
});
static COUNT_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9][0-9\s\.,]*)\s*(?:reviews?|avis)").expect("valid count text regex")
});
static USERS_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9][0-9\s\.,]*)\s*(?:users?|utilisateurs)").expect("valid users text regex")
});
static REVIEW_CARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"<div[^>]*class="[^"]*WCpQbe[^"]*"[\s\S]*?"#,
        r#"<span[^>]*aria-label="([^"]*?)"[\s\S]*?"#,
        r#"<span[^>]*class="[^"]*QJHSge[^"]*"[^>]*>([\s\S]*?)</span>[\s\S]*?"#,
        r#"<span[^>]*class="[^"]*dehysf[^"]*"[^>]*>([\s\S]*?)</span>"#,
    ))
    .expect("valid review card regex")
});
static LABEL_OUT_OF_FIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9](?:[\.,][0-9])?)\s*/?\s*5").expect("valid star label regex")
});
static LABEL_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9])").expect("valid star digit regex"));

/// Text-pattern metrics plus review cards matched by CSS class.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackExtractor;

impl Extractor for FallbackExtractor {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn extract(&self, html: &str) -> Extraction {
        Extraction {
            metrics: extract_metrics_fallback(html),
            reviews: extract_reviews_fallback(html),
        }
    }
}

/// Reads `"4,5 étoiles"`, `"1,234 reviews"`, `"10,000+ users"` style phrases.
/// Each pattern uses its first match in the document.
#[must_use]
pub fn extract_metrics_fallback(html: &str) -> PartialMetrics {
    let mut metrics = PartialMetrics::default();
    if let Some(caps) = AVG_TEXT_RE.captures(html) {
        metrics.fill_avg(to_number(&caps[1]));
    }
    if let Some(caps) = COUNT_TEXT_RE.captures(html) {
        metrics.fill_count(to_number(&caps[1]));
    }
    if let Some(caps) = USERS_TEXT_RE.captures(html) {
        metrics.fill_users(to_number(&caps[1]));
    }
    metrics
}

/// Scans review cards. Cards whose star label yields no rating, or whose
/// body is empty after sanitizing, are skipped.
#[must_use]
pub fn extract_reviews_fallback(html: &str) -> Vec<ReviewCandidate> {
    REVIEW_CARD_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let stars = stars_from_label(&caps[1]);
            if stars == 0 {
                return None;
            }
            let text = sanitize_text(&caps[2]);
            if text.is_empty() {
                return None;
            }
            Some(ReviewCandidate {
                stars,
                date: sanitize_text(&caps[3]),
                text,
                lang: None,
            })
        })
        .collect()
}

/// Parses aria labels such as `"Rated 4 out of 5"` or `"4,5/5"`. Falls back
/// to the first digit in the label; `0` means no rating was found.
fn stars_from_label(label: &str) -> u8 {
    if label.is_empty() {
        return 0;
    }
    let raw = LABEL_OUT_OF_FIVE_RE
        .captures(label)
        .or_else(|| LABEL_DIGIT_RE.captures(label))
        .map(|caps| caps[1].to_string());
    raw.map_or(0, |r| clamp_stars(to_number(&r)))
}
