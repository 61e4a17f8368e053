//! Top-review selection: a bounded, recency-preferring ranking.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use cwsr_core::Review;

/// Words that earn a small score bonus when they appear in a review.
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "excellent",
    "utile",
    "génial",
    "amazing",
    "love",
    "helpful",
    "parfait",
    "recommande",
    "recommend",
];

/// `stars * 10`, plus up to 3 points for length (one per 80 characters),
/// plus 2 if the text contains a [`POSITIVE_KEYWORDS`] entry.
#[must_use]
pub fn score_review(review: &Review) -> f64 {
    let base = f64::from(review.stars) * 10.0;
    #[allow(clippy::cast_precision_loss)]
    let length_weight = (review.text.chars().count() as f64 / 80.0).min(3.0);
    let lower = review.text.to_lowercase();
    let keyword_bonus = if POSITIVE_KEYWORDS.iter().any(|w| lower.contains(w)) {
        2.0
    } else {
        0.0
    };
    base + length_weight + keyword_bonus
}

/// Picks up to `count` reviews relative to the current time.
#[must_use]
pub fn pick_top_reviews(reviews: &[Review], window_days: u32, count: usize) -> Vec<Review> {
    pick_top_reviews_at(reviews, window_days, count, Utc::now())
}

/// Picks up to `count` reviews, preferring those dated within `window_days`
/// of `now`.
///
/// Recent reviews are ranked first; if fewer than `count` qualify, the
/// remainder is filled from older reviews in the same ranking order. Reviews
/// whose date cannot be parsed count as older. A window reaching past the
/// earliest representable time makes every dated review recent.
#[must_use]
pub fn pick_top_reviews_at(
    reviews: &[Review],
    window_days: u32,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<Review> {
    let threshold = now.checked_sub_signed(Duration::days(i64::from(window_days)));

    let (mut recent, mut older): (Vec<Ranked<'_>>, Vec<Ranked<'_>>) = reviews
        .iter()
        .map(Ranked::new)
        .partition(|r| {
            r.day
                .is_some_and(|d| threshold.is_none_or(|t| midnight_utc(d) >= t))
        });

    recent.sort_by(Ranked::cmp_desc);
    older.sort_by(Ranked::cmp_desc);

    recent
        .into_iter()
        .chain(older)
        .take(count)
        .map(|r| r.review.clone())
        .collect()
}

struct Ranked<'a> {
    review: &'a Review,
    score: f64,
    day: Option<NaiveDate>,
}

impl<'a> Ranked<'a> {
    fn new(review: &'a Review) -> Self {
        Self {
            review,
            score: score_review(review),
            day: NaiveDate::parse_from_str(&review.date, "%Y-%m-%d").ok(),
        }
    }

    /// Score, then stars, then date, all descending. Undated sorts last.
    fn cmp_desc(a: &Self, b: &Self) -> Ordering {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.review.stars.cmp(&a.review.stars))
            .then_with(|| match (a.day, b.day) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}

fn midnight_utc(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
#[path = "select_test.rs"]
mod tests;
