//! Value coercion helpers shared by the extractors.
//!
//! Store markup mixes locales, so numbers arrive as `"4,5"`, `"1,234"`,
//! `"1 234 users"` or plain JSON numbers. Everything here is total: bad input
//! yields `0`, `NaN`, or today's date rather than an error.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;

static DAY_FIRST_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{1,2})/([0-9]{1,2})/([0-9]{2,4})").expect("valid day-first date regex")
});
static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{4})-([0-9]{2})-([0-9]{2})").expect("valid iso date regex"));

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
// `%B` also accepts abbreviated month names when parsing.
const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%d %B %Y"];

/// Parses a loosely formatted numeric string.
///
/// Everything except digits, commas and dots is dropped first. A comma
/// followed by exactly three digits is a thousands separator. A single
/// remaining comma that sits after the last dot is a decimal separator (any
/// dots before it are grouping). Empty input is `0`; unparseable input is
/// `NaN`.
#[must_use]
pub fn to_number(raw: &str) -> f64 {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    let normalized = strip_grouping_commas(&kept);

    let comma_count = normalized.matches(',').count();
    let candidate = if comma_count == 1 && normalized.find(',') > normalized.rfind('.') {
        normalized.replace('.', "").replace(',', ".")
    } else {
        normalized.replace(',', "")
    };

    if candidate.is_empty() {
        return 0.0;
    }
    candidate.parse::<f64>().unwrap_or(f64::NAN)
}

/// Coerces a JSON value to a number: numbers pass through, strings go through
/// [`to_number`], anything else is `0`.
#[must_use]
pub fn value_to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => to_number(s),
        _ => 0.0,
    }
}

/// Whether a JSON value counts as "present" for field fallbacks: not null,
/// not `false`, not zero, not an empty string.
#[must_use]
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Returns the first candidate that [`is_present`].
pub fn first_present<'a, I>(candidates: I) -> Option<&'a Value>
where
    I: IntoIterator<Item = Option<&'a Value>>,
{
    candidates.into_iter().flatten().find(|v| is_present(v))
}

/// Rounds and clamps a rating into `1..=5`. Non-finite input maps to `0`,
/// which callers treat as "no rating".
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_stars(stars: f64) -> u8 {
    if !stars.is_finite() {
        return 0;
    }
    // Clamped to 1..=5 before the cast, so truncation cannot occur.
    stars.round().clamp(1.0, 5.0) as u8
}

/// Rounds to `decimals` places, half away from zero.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Rounds a count to a non-negative integer. `NaN` becomes `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_count(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    // Saturating float-to-int cast.
    value.round() as u64
}

/// Cheap 32-bit rolling hash (`h * 31 + c` over UTF-16 units), rendered as
/// signed hex. Used only to build dedup keys.
#[must_use]
pub fn hash_text(text: &str) -> String {
    let hash = text.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    });
    if hash < 0 {
        format!("-{:x}", hash.unsigned_abs())
    } else {
        format!("{hash:x}")
    }
}

/// Normalizes an arbitrary date string to `YYYY-MM-DD`.
///
/// Tries, in order: a direct parse of common machine and English formats, a
/// day-first `D/M/Y` pattern (two-digit years are 20xx), an embedded
/// `YYYY-MM-DD` substring, and finally `today`.
#[must_use]
pub fn normalize_date(input: &str, today: NaiveDate) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return format_day(today);
    }

    if let Some(day) = parse_direct(trimmed) {
        return format_day(day);
    }

    if let Some(caps) = DAY_FIRST_DATE_RE.captures(trimmed) {
        let day = caps[1].parse::<u32>().ok();
        let month = caps[2].parse::<u32>().ok();
        let year_raw = &caps[3];
        let year = if year_raw.len() == 2 {
            format!("20{year_raw}").parse::<i32>().ok()
        } else {
            year_raw.parse::<i32>().ok()
        };
        if let (Some(y), Some(m), Some(d)) = (year, month, day) {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                return format_day(date);
            }
        }
    }

    if let Some(caps) = ISO_DATE_RE.captures(trimmed) {
        return format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
    }

    format_day(today)
}

fn parse_direct(input: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        })
}

fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Removes commas that are followed by exactly three digits and then a
/// non-digit (or the end of input). Input must already be ASCII-only.
fn strip_grouping_commas(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    for (i, &b) in bytes.iter().enumerate() {
        if b == b',' {
            let three_digits = bytes
                .get(i + 1..i + 4)
                .is_some_and(|g| g.iter().all(u8::is_ascii_digit));
            let boundary = !bytes.get(i + 4).is_some_and(u8::is_ascii_digit);
            if three_digits && boundary {
                continue;
            }
        }
        out.push(char::from(b));
    }
    out
}

#[cfg(test)]
#[path = "coerce_test.rs"]
mod tests;
