use chrono::TimeZone;
use cwsr_core::ReviewSource;

use super::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

fn review(stars: u8, date: &str, text: &str) -> Review {
    Review {
        stars,
        date: date.to_string(),
        text: text.to_string(),
        lang: None,
        source: ReviewSource::Cws,
    }
}

// -----------------------------------------------------------------------
// score_review
// -----------------------------------------------------------------------

#[test]
fn score_is_stars_length_and_keyword() {
    assert!((score_review(&review(4, "2024-03-01", "ok")) - (40.0 + 2.0 / 80.0)).abs() < 1e-9);
    let keyword = review(4, "2024-03-01", "Very HELPFUL");
    assert!((score_review(&keyword) - (40.0 + 12.0 / 80.0 + 2.0)).abs() < 1e-9);
}

#[test]
fn length_bonus_caps_at_three() {
    let long = review(1, "2024-03-01", &"x".repeat(1000));
    assert!((score_review(&long) - 13.0).abs() < 1e-9);
}

// -----------------------------------------------------------------------
// pick_top_reviews_at
// -----------------------------------------------------------------------

#[test]
fn never_returns_more_than_count() {
    let reviews: Vec<_> = (0..10)
        .map(|i| review(5, "2024-03-14", &format!("review {i}")))
        .collect();
    assert_eq!(pick_top_reviews_at(&reviews, 7, 3, now()).len(), 3);
    assert!(pick_top_reviews_at(&reviews, 7, 0, now()).is_empty());
}

#[test]
fn returns_everything_when_fewer_than_count() {
    let reviews = vec![
        review(3, "2020-01-01", "old"),
        review(4, "2024-03-14", "new"),
    ];
    assert_eq!(pick_top_reviews_at(&reviews, 7, 3, now()).len(), 2);
    assert!(pick_top_reviews_at(&[], 7, 3, now()).is_empty());
}

#[test]
fn recent_reviews_win_over_higher_scoring_old_ones() {
    let reviews = vec![
        review(5, "2023-01-01", "amazing old review"),
        review(2, "2024-03-10", "meh"),
        review(3, "2024-03-12", "fine"),
        review(5, "2022-06-01", "excellent"),
    ];
    let picked = pick_top_reviews_at(&reviews, 7, 2, now());
    let dates: Vec<_> = picked.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, ["2024-03-12", "2024-03-10"]);
}

#[test]
fn fills_from_older_reviews_in_rank_order() {
    let reviews = vec![
        review(4, "2024-03-14", "recent"),
        review(2, "2023-01-01", "older low"),
        review(5, "2023-02-01", "older high"),
    ];
    let picked = pick_top_reviews_at(&reviews, 7, 3, now());
    let texts: Vec<_> = picked.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, ["recent", "older high", "older low"]);
}

#[test]
fn window_boundary_is_inclusive_at_midnight() {
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
    let reviews = vec![
        review(1, "2024-03-08", "on the boundary"),
        review(5, "2024-03-07", "just outside"),
    ];
    let picked = pick_top_reviews_at(&reviews, 7, 1, now);
    assert_eq!(picked[0].text, "on the boundary");
}

#[test]
fn equal_scores_break_on_newest_date() {
    let reviews = vec![
        review(4, "2024-03-09", "same"),
        review(4, "2024-03-13", "same"),
        review(4, "not a date", "same"),
    ];
    let picked = pick_top_reviews_at(&reviews, 30, 3, now());
    let dates: Vec<_> = picked.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, ["2024-03-13", "2024-03-09", "not a date"]);
}

#[test]
fn unparseable_dates_count_as_older() {
    let reviews = vec![
        review(5, "someday", "excellent and helpful"),
        review(1, "2024-03-14", "bad"),
    ];
    let picked = pick_top_reviews_at(&reviews, 7, 1, now());
    assert_eq!(picked[0].text, "bad");
}

#[test]
fn maximal_window_treats_every_dated_review_as_recent() {
    let reviews = vec![
        review(5, "someday", "excellent and helpful"),
        review(2, "1990-01-01", "meh"),
        review(3, "2024-03-14", "ok"),
    ];
    let picked = pick_top_reviews_at(&reviews, u32::MAX, 3, now());
    let texts: Vec<&str> = picked.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, ["ok", "meh", "excellent and helpful"]);
}
