//! Tier 2: the `AF_initDataCallback({...})` hydration blobs.
//!
//! The payload's `data` field is a deeply nested positional array with no
//! stable schema, so instead of walking it we re-serialize it to a flat JSON
//! string and scan for the few labelled values we need.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{Extraction, Extractor, ReviewCandidate};
use crate::coerce::{clamp_stars, to_number};

static CALLBACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)AF_initDataCallback\((\{.*?\})\);?").expect("valid hydration callback regex")
});
static AVERAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""AVERAGE_RATING"\s*,\s*(\d+(?:\.\d+)?)"#).expect("valid average regex")
});
static RATING_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""RATING_COUNT"\s*,\s*(\d+)"#).expect("valid count regex"));
static USER_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""USER_COUNT"\s*,\s*(\d+)"#).expect("valid users regex"));
static REVIEW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\{"reviewTitle".*?"reviewText"\s*:\s*"(.*?)".*?"starRating"\s*:\s*(\d)"#)
        .expect("valid review fragment regex")
});
static LAST_MODIFIED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""lastModifiedDate"\s*:\s*"([^"]+)""#).expect("valid last-modified regex")
});

/// Scans hydration payloads for aggregate figures and review fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct HydratedStateExtractor;

impl Extractor for HydratedStateExtractor {
    fn name(&self) -> &'static str {
        "hydrated"
    }

    fn extract(&self, html: &str) -> Extraction {
        let mut out = Extraction::default();

        for cap in CALLBACK_RE.captures_iter(html) {
            let Some(raw) = cap.get(1).map(|m| m.as_str()) else {
                continue;
            };
            let payload: Value = match serde_json::from_str(raw) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed hydration payload");
                    continue;
                }
            };
            let Some(data) = payload.get("data").filter(|d| d.is_array()) else {
                continue;
            };
            let flat = match serde_json::to_string(data) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to re-serialize hydration data");
                    continue;
                }
            };
            scan_flat_state(&flat, &mut out);
        }

        out
    }
}

fn scan_flat_state(flat: &str, out: &mut Extraction) {
    if let Some(caps) = AVERAGE_RE.captures(flat) {
        out.metrics.fill_avg(to_number(&caps[1]));
    }
    if let Some(caps) = RATING_COUNT_RE.captures(flat) {
        out.metrics.fill_count(to_number(&caps[1]));
    }
    if let Some(caps) = USER_COUNT_RE.captures(flat) {
        out.metrics.fill_users(to_number(&caps[1]));
    }

    let fragments: Vec<_> = REVIEW_RE.captures_iter(flat).collect();
    for (idx, caps) in fragments.iter().enumerate() {
        let (Some(whole), Some(text_raw), Some(stars_raw)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };

        let stars = to_number(stars_raw.as_str());
        let text = decode_json_string(text_raw.as_str());
        if stars == 0.0 || text.is_empty() {
            continue;
        }

        // The last-modified field may trail the star rating, so look up to
        // the start of the next fragment.
        let window_end = fragments
            .get(idx + 1)
            .and_then(|next| next.get(0))
            .map_or(flat.len(), |m| m.start());
        let date = LAST_MODIFIED_RE
            .captures(&flat[whole.start()..window_end])
            .map(|c| c[1].to_string())
            .unwrap_or_default();

        out.reviews.push(ReviewCandidate {
            stars: clamp_stars(stars),
            date,
            text,
            lang: None,
        });
    }
}

/// Reverses JSON string escaping (`\n`, `\"`, `\uXXXX`). Returns the input
/// unchanged if it is not a valid escaped sequence.
fn decode_json_string(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}
