//! Extraction tiers.
//!
//! Each tier is a pure function from raw HTML to partial metrics and review
//! candidates, so a tier can be swapped out when upstream markup drifts
//! without touching the others. Precedence is decided by the caller:
//! [`DEFAULT_EXTRACTORS`] lists them most-structured first.

mod fallback;
mod hydrated;
mod jsonld;

pub use fallback::{extract_metrics_fallback, extract_reviews_fallback, FallbackExtractor};
pub use hydrated::HydratedStateExtractor;
pub use jsonld::JsonLdExtractor;

/// Tiers in precedence order: JSON-LD, hydrated state, markup fallback.
pub const DEFAULT_EXTRACTORS: &[&dyn Extractor] =
    &[&JsonLdExtractor, &HydratedStateExtractor, &FallbackExtractor];

/// A single extraction strategy.
pub trait Extractor: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn extract(&self, html: &str) -> Extraction;
}

/// Output of one extraction tier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub metrics: PartialMetrics,
    pub reviews: Vec<ReviewCandidate>,
}

/// A review as lifted from the page, before dedup and normalization.
///
/// `stars` is already clamped to `1..=5`; `date` and `text` are raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCandidate {
    pub stars: u8,
    pub date: String,
    pub text: String,
    pub lang: Option<String>,
}

/// Rating metrics where each field is either unset or a finite, non-zero value.
///
/// Filling is first-writer-wins: once a field holds a value, later writes
/// are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialMetrics {
    pub avg: Option<f64>,
    pub count: Option<f64>,
    pub users: Option<f64>,
}

impl PartialMetrics {
    pub fn fill_avg(&mut self, value: f64) {
        fill(&mut self.avg, value);
    }

    pub fn fill_count(&mut self, value: f64) {
        fill(&mut self.count, value);
    }

    pub fn fill_users(&mut self, value: f64) {
        fill(&mut self.users, value);
    }

    /// Folds a lower-precedence result into `self` without overwriting.
    pub fn merge(&mut self, other: PartialMetrics) {
        if let Some(v) = other.avg {
            self.fill_avg(v);
        }
        if let Some(v) = other.count {
            self.fill_count(v);
        }
        if let Some(v) = other.users {
            self.fill_users(v);
        }
    }
}

fn fill(slot: &mut Option<f64>, value: f64) {
    if slot.is_none() && value.is_finite() && value != 0.0 {
        *slot = Some(value);
    }
}
