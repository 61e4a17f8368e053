use super::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// -----------------------------------------------------------------------
// to_number
// -----------------------------------------------------------------------

#[test]
fn to_number_reads_decimal_comma() {
    assert!((to_number("4,5") - 4.5).abs() < f64::EPSILON);
}

#[test]
fn to_number_reads_thousands_comma() {
    assert!((to_number("1,234") - 1234.0).abs() < f64::EPSILON);
    assert!((to_number("1,234,567") - 1_234_567.0).abs() < f64::EPSILON);
}

#[test]
fn to_number_reads_thousands_comma_with_decimal_dot() {
    assert!((to_number("1,234.5") - 1234.5).abs() < f64::EPSILON);
}

#[test]
fn to_number_reads_european_grouping() {
    assert!((to_number("1.234,5") - 1234.5).abs() < f64::EPSILON);
}

#[test]
fn to_number_ignores_words_and_spaces() {
    assert!((to_number("10 000+ users") - 10_000.0).abs() < f64::EPSILON);
    assert!((to_number("4.6 out of") - 4.6).abs() < f64::EPSILON);
}

#[test]
fn to_number_empty_is_zero() {
    assert_eq!(to_number(""), 0.0);
    assert_eq!(to_number("no digits"), 0.0);
}

#[test]
fn to_number_garbage_is_nan() {
    assert!(to_number("1.2.3").is_nan());
    assert!(to_number(".").is_nan());
}

#[test]
fn value_to_number_handles_json_shapes() {
    assert!((value_to_number(&serde_json::json!(4.6)) - 4.6).abs() < f64::EPSILON);
    assert!((value_to_number(&serde_json::json!("120")) - 120.0).abs() < f64::EPSILON);
    assert_eq!(value_to_number(&serde_json::json!(null)), 0.0);
    assert_eq!(value_to_number(&serde_json::json!({"a": 1})), 0.0);
}

#[test]
fn first_present_skips_zero_and_empty() {
    let zero = serde_json::json!(0);
    let empty = serde_json::json!("");
    let count = serde_json::json!("88");
    let picked = first_present([Some(&zero), None, Some(&empty), Some(&count)]);
    assert_eq!(picked, Some(&count));
}

// -----------------------------------------------------------------------
// clamp_stars / rounding
// -----------------------------------------------------------------------

#[test]
fn clamp_stars_maps_into_one_to_five() {
    assert_eq!(clamp_stars(4.5), 5);
    assert_eq!(clamp_stars(4.4), 4);
    assert_eq!(clamp_stars(0.2), 1);
    assert_eq!(clamp_stars(-3.0), 1);
    assert_eq!(clamp_stars(17.0), 5);
}

#[test]
fn clamp_stars_is_idempotent() {
    for raw in [-2.0, 0.0, 1.0, 2.5, 3.49, 4.5, 9.0] {
        let once = clamp_stars(raw);
        assert_eq!(clamp_stars(f64::from(once)), once, "input {raw}");
    }
}

#[test]
fn clamp_stars_non_finite_is_zero() {
    assert_eq!(clamp_stars(f64::NAN), 0);
    assert_eq!(clamp_stars(f64::INFINITY), 0);
}

#[test]
fn round_to_one_decimal() {
    assert!((round_to(4.56, 1) - 4.6).abs() < 1e-9);
    assert!((round_to(4.64, 1) - 4.6).abs() < 1e-9);
}

#[test]
fn round_count_floors_at_zero() {
    assert_eq!(round_count(-4.0), 0);
    assert_eq!(round_count(f64::NAN), 0);
    assert_eq!(round_count(119.6), 120);
}

// -----------------------------------------------------------------------
// hash_text
// -----------------------------------------------------------------------

#[test]
fn hash_text_is_stable_and_distinguishes_strings() {
    assert_eq!(hash_text("amazing"), hash_text("amazing"));
    assert_ne!(hash_text("amazing"), hash_text("amazing!"));
    assert_eq!(hash_text(""), "0");
}

#[test]
fn hash_text_matches_known_values() {
    // "a" = 97 = 0x61; "ab" = 97 * 31 + 98 = 3105 = 0xc21
    assert_eq!(hash_text("a"), "61");
    assert_eq!(hash_text("ab"), "c21");
}

// -----------------------------------------------------------------------
// normalize_date
// -----------------------------------------------------------------------

#[test]
fn normalize_date_keeps_iso_day() {
    let today = day(2026, 1, 1);
    assert_eq!(normalize_date("2024-01-02", today), "2024-01-02");
}

#[test]
fn normalize_date_is_idempotent() {
    let today = day(2026, 1, 1);
    let once = normalize_date("12/03/2024", today);
    assert_eq!(normalize_date(&once, today), once);
}

#[test]
fn normalize_date_converts_timestamps_to_utc_day() {
    let today = day(2026, 1, 1);
    assert_eq!(
        normalize_date("2024-01-02T23:30:00-02:00", today),
        "2024-01-03"
    );
    assert_eq!(normalize_date("2024-01-02T10:00:00", today), "2024-01-02");
}

#[test]
fn normalize_date_reads_english_month_names() {
    let today = day(2026, 1, 1);
    assert_eq!(normalize_date("January 5, 2024", today), "2024-01-05");
    assert_eq!(normalize_date("Jan 5, 2024", today), "2024-01-05");
}

#[test]
fn normalize_date_reads_day_first_slashes() {
    let today = day(2026, 1, 1);
    assert_eq!(normalize_date("12/03/2024", today), "2024-03-12");
    assert_eq!(normalize_date("5/7/24", today), "2024-07-05");
}

#[test]
fn normalize_date_finds_embedded_iso_day() {
    let today = day(2026, 1, 1);
    assert_eq!(normalize_date("updated 2023-11-30 by owner", today), "2023-11-30");
}

#[test]
fn normalize_date_falls_back_to_today() {
    let today = day(2026, 1, 1);
    assert_eq!(normalize_date("", today), "2026-01-01");
    assert_eq!(normalize_date("il y a 3 jours", today), "2026-01-01");
}
