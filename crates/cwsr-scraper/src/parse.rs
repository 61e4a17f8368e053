//! Merges the extraction tiers into normalized metrics and reviews.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use cwsr_core::{Metrics, Review, ReviewSource};

use crate::coerce::{hash_text, normalize_date, round_count, round_to};
use crate::error::ScraperError;
use crate::extract::{Extractor, PartialMetrics, ReviewCandidate, DEFAULT_EXTRACTORS};
use crate::sanitize::sanitize_text;

/// Everything lifted from one store page, before top-review selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPage {
    pub metrics: Metrics,
    /// Deduplicated reviews in extraction order, each with sanitized text and
    /// a `YYYY-MM-DD` date.
    pub reviews: Vec<Review>,
}

/// Parses a store page using today's UTC date for undated reviews.
///
/// # Errors
///
/// Returns [`ScraperError::MetricsMissing`] when no tier found an average
/// rating.
pub fn parse_store_page(html: &str) -> Result<ParsedPage, ScraperError> {
    parse_store_page_at(html, Utc::now().date_naive())
}

/// Same as [`parse_store_page`] with an explicit "today", which is the date
/// assigned to reviews whose date cannot be read.
///
/// # Errors
///
/// Returns [`ScraperError::MetricsMissing`] when no tier found an average
/// rating.
pub fn parse_store_page_at(html: &str, today: NaiveDate) -> Result<ParsedPage, ScraperError> {
    parse_with_extractors(html, DEFAULT_EXTRACTORS, today)
}

/// Runs `extractors` in order. Metrics are first-writer-wins across tiers;
/// review candidates are concatenated, deduplicated, then normalized.
///
/// # Errors
///
/// Returns [`ScraperError::MetricsMissing`] when no extractor produced an
/// average rating.
pub fn parse_with_extractors(
    html: &str,
    extractors: &[&dyn Extractor],
    today: NaiveDate,
) -> Result<ParsedPage, ScraperError> {
    let mut metrics = PartialMetrics::default();
    let mut candidates: Vec<ReviewCandidate> = Vec::new();

    for extractor in extractors {
        let extraction = extractor.extract(html);
        tracing::debug!(
            extractor = extractor.name(),
            has_avg = extraction.metrics.avg.is_some(),
            reviews = extraction.reviews.len(),
            "extraction tier finished"
        );
        metrics.merge(extraction.metrics);
        candidates.extend(extraction.reviews);
    }

    let Some(avg) = metrics.avg else {
        return Err(ScraperError::MetricsMissing);
    };

    let reviews: Vec<Review> = dedup_candidates(candidates)
        .into_iter()
        .filter_map(|candidate| normalize_candidate(candidate, today))
        .collect();

    Ok(ParsedPage {
        metrics: Metrics {
            avg: round_to(avg, 1),
            count: round_count(metrics.count.unwrap_or_default()),
            users: round_count(metrics.users.unwrap_or_default()),
        },
        reviews,
    })
}

/// Keeps the first candidate for each `date|stars|hash(text)` key. Keys use
/// the raw values, so the same review seen by two tiers in different
/// formats survives twice.
fn dedup_candidates(candidates: Vec<ReviewCandidate>) -> Vec<ReviewCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(dedup_key(c)))
        .collect()
}

fn dedup_key(candidate: &ReviewCandidate) -> String {
    format!(
        "{}|{}|{}",
        candidate.date,
        candidate.stars,
        hash_text(&candidate.text)
    )
}

fn normalize_candidate(candidate: ReviewCandidate, today: NaiveDate) -> Option<Review> {
    let text = sanitize_text(&candidate.text);
    let date = normalize_date(&candidate.date, today);
    if text.is_empty() || date.is_empty() {
        return None;
    }
    Some(Review {
        stars: candidate.stars,
        date,
        text,
        lang: candidate.lang,
        source: ReviewSource::Cws,
    })
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
