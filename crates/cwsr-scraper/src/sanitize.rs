//! Plain-text cleanup for review bodies lifted out of HTML.

use std::sync::LazyLock;

use regex::Regex;

/// Upper bound on review text length, in characters.
pub const MAX_TEXT_CHARS: usize = 600;

static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>\s*").expect("valid br regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Converts `<br>` to newlines, strips remaining tags, decodes the handful of
/// entities the store emits, trims, and truncates to [`MAX_TEXT_CHARS`].
#[must_use]
pub fn sanitize_text(input: &str) -> String {
    let with_breaks = BR_RE.replace_all(input, "\n");
    let without_tags = TAG_RE.replace_all(&with_breaks, "");
    // `&amp;` last so `&amp;quot;` stays `&quot;`.
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.trim().chars().take(MAX_TEXT_CHARS).collect()
}
