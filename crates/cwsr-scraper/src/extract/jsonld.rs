//! Tier 1: schema.org JSON-LD extraction.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{Extraction, Extractor, ReviewCandidate};
use crate::coerce::{clamp_stars, first_present, value_to_number};

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]+type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid json-ld script regex")
});

/// Reads `aggregateRating`, user counts, and embedded `review` nodes from
/// every `<script type="application/ld+json">` block.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLdExtractor;

impl Extractor for JsonLdExtractor {
    fn name(&self) -> &'static str {
        "jsonld"
    }

    fn extract(&self, html: &str) -> Extraction {
        let mut out = Extraction::default();

        for cap in SCRIPT_RE.captures_iter(html) {
            let raw = cap.get(1).map_or("", |m| m.as_str()).trim();
            if raw.is_empty() {
                continue;
            }
            let value: Value = match serde_json::from_str(raw) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed json-ld block");
                    continue;
                }
            };
            let Some(node) = select_product_node(&value) else {
                continue;
            };
            read_product_node(node, &mut out);
        }

        out
    }
}

/// Picks the product node: for arrays (or `@graph` containers) the first
/// node typed `Product`, else the first node; objects are used as-is.
fn select_product_node(value: &Value) -> Option<&Value> {
    let nodes = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("@graph").and_then(Value::as_array) {
            Some(graph) => graph,
            None => return Some(value),
        },
        _ => return None,
    };
    nodes
        .iter()
        .find(|n| is_product_type(n.get("@type")))
        .or_else(|| nodes.first())
}

fn is_product_type(node_type: Option<&Value>) -> bool {
    match node_type {
        Some(Value::String(s)) => s == "Product",
        Some(Value::Array(values)) => values.iter().any(|v| v.as_str() == Some("Product")),
        _ => false,
    }
}

fn read_product_node(node: &Value, out: &mut Extraction) {
    if let Some(aggregate) = node.get("aggregateRating").filter(|v| v.is_object()) {
        if let Some(avg) = aggregate.get("ratingValue") {
            out.metrics.fill_avg(value_to_number(avg));
        }
        if let Some(count) = first_present([
            aggregate.get("reviewCount"),
            aggregate.get("ratingCount"),
        ]) {
            out.metrics.fill_count(value_to_number(count));
        }
    }

    if node.get("offers").is_some_and(|o| o.is_object() || o.is_array()) {
        let seller_count = node
            .get("offers")
            .and_then(|o| o.get("seller"))
            .and_then(|s| s.get("aggregateRating"))
            .and_then(|a| a.get("ratingCount"));
        if let Some(users) = first_present([seller_count, node.get("interactionCount")]) {
            out.metrics.fill_users(value_to_number(users));
        }
    }

    if out.metrics.users.is_none() {
        if let Some(stats) = node.get("interactionStatistic").and_then(Value::as_array) {
            if let Some(stat) = stats.iter().find(|s| is_user_interaction(s.get("interactionType")))
            {
                if let Some(count) = stat.get("userInteractionCount") {
                    out.metrics.fill_users(value_to_number(count));
                }
            }
        }
    }

    let review_nodes: &[Value] = match node.get("review") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(single @ Value::Object(_)) => std::slice::from_ref(single),
        _ => &[],
    };
    out.reviews.extend(review_nodes.iter().filter_map(review_from_node));
}

/// `interactionType` appears as a URL string (`https://schema.org/UserDownloads`)
/// or as a typed object (`{"@type": "UserDownloads"}`).
fn is_user_interaction(interaction_type: Option<&Value>) -> bool {
    match interaction_type {
        Some(Value::String(s)) => s.contains("User"),
        Some(Value::Object(map)) => map
            .get("@type")
            .and_then(Value::as_str)
            .is_some_and(|t| t.contains("User")),
        Some(Value::Array(values)) => values
            .iter()
            .any(|v| v.as_str().is_some_and(|t| t.contains("User"))),
        _ => false,
    }
}

fn review_from_node(node: &Value) -> Option<ReviewCandidate> {
    let rating = first_present([
        node.get("reviewRating").and_then(|r| r.get("ratingValue")),
        node.get("starRating"),
    ]);
    let stars = rating.map_or(0.0, value_to_number);
    if !stars.is_finite() || stars == 0.0 {
        return None;
    }

    let text = first_present([node.get("reviewBody"), node.get("description")])
        .and_then(Value::as_str)
        .unwrap_or_default();
    if text.is_empty() {
        return None;
    }

    let date = first_present([node.get("datePublished"), node.get("dateCreated")])
        .and_then(Value::as_str)
        .unwrap_or_default();
    let lang = first_present([node.get("inLanguage"), node.get("reviewBodyLanguage")])
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(ReviewCandidate {
        stars: clamp_stars(stars),
        date: date.to_string(),
        text: text.to_string(),
        lang,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(json: &str) -> String {
        format!(
            "<html><head><script type=\"application/ld+json\">{json}</script></head><body></body></html>"
        )
    }

    #[test]
    fn reads_aggregate_rating_and_reviews() {
        let html = wrap(
            r#"{
                "@context": "https://schema.org",
                "@type": "Product",
                "aggregateRating": {"ratingValue": "4.6", "reviewCount": 120},
                "review": [{
                    "reviewRating": {"ratingValue": 5},
                    "datePublished": "2024-01-02",
                    "reviewBody": "amazing, love it",
                    "inLanguage": "en"
                }]
            }"#,
        );
        let out = JsonLdExtractor.extract(&html);
        assert_eq!(out.metrics.avg, Some(4.6));
        assert_eq!(out.metrics.count, Some(120.0));
        assert_eq!(out.reviews.len(), 1);
        assert_eq!(out.reviews[0].stars, 5);
        assert_eq!(out.reviews[0].date, "2024-01-02");
        assert_eq!(out.reviews[0].lang.as_deref(), Some("en"));
    }

    #[test]
    fn falls_back_to_rating_count() {
        let html = wrap(r#"{"@type":"Product","aggregateRating":{"ratingValue":4,"reviewCount":0,"ratingCount":"1,234"}}"#);
        let out = JsonLdExtractor.extract(&html);
        assert_eq!(out.metrics.count, Some(1234.0));
    }

    #[test]
    fn picks_product_node_from_array() {
        let html = wrap(
            r#"[
                {"@type": "BreadcrumbList", "aggregateRating": {"ratingValue": 1.0}},
                {"@type": "Product", "aggregateRating": {"ratingValue": 4.1}}
            ]"#,
        );
        let out = JsonLdExtractor.extract(&html);
        assert_eq!(out.metrics.avg, Some(4.1));
    }

    #[test]
    fn array_without_product_uses_first_node() {
        let html = wrap(
            r#"[
                {"@type": "WebApplication", "aggregateRating": {"ratingValue": 3.9}},
                {"@type": "Organization", "aggregateRating": {"ratingValue": 1.0}}
            ]"#,
        );
        let out = JsonLdExtractor.extract(&html);
        assert_eq!(out.metrics.avg, Some(3.9));
    }

    #[test]
    fn reads_users_from_seller_then_interaction_statistic() {
        let seller = wrap(
            r#"{"@type":"Product","offers":{"seller":{"aggregateRating":{"ratingCount":"10,000"}}}}"#,
        );
        assert_eq!(JsonLdExtractor.extract(&seller).metrics.users, Some(10_000.0));

        let stats = wrap(
            r#"{"@type":"Product","interactionStatistic":[
                {"interactionType":"https://schema.org/LikeAction","userInteractionCount":5},
                {"interactionType":{"@type":"UserDownloads"},"userInteractionCount":"2 500"}
            ]}"#,
        );
        assert_eq!(JsonLdExtractor.extract(&stats).metrics.users, Some(2500.0));
    }

    #[test]
    fn drops_reviews_without_stars_or_text() {
        let html = wrap(
            r#"{"@type":"Product","review":[
                {"reviewRating":{"ratingValue":0},"reviewBody":"no stars"},
                {"reviewRating":{"ratingValue":4},"reviewBody":""},
                {"starRating":"3","description":"fallback fields","dateCreated":"2024-02-02"}
            ]}"#,
        );
        let out = JsonLdExtractor.extract(&html);
        assert_eq!(out.reviews.len(), 1);
        assert_eq!(out.reviews[0].stars, 3);
        assert_eq!(out.reviews[0].text, "fallback fields");
        assert_eq!(out.reviews[0].date, "2024-02-02");
    }

    #[test]
    fn malformed_block_does_not_stop_later_blocks() {
        let html = format!(
            "{}{}",
            wrap("{not json"),
            wrap(r#"{"@type":"Product","aggregateRating":{"ratingValue":4.4}}"#)
        );
        let out = JsonLdExtractor.extract(&html);
        assert_eq!(out.metrics.avg, Some(4.4));
    }

    #[test]
    fn first_block_wins_for_metrics() {
        let html = format!(
            "{}{}",
            wrap(r#"{"@type":"Product","aggregateRating":{"ratingValue":4.4}}"#),
            wrap(r#"{"@type":"Product","aggregateRating":{"ratingValue":2.0,"reviewCount":9}}"#)
        );
        let out = JsonLdExtractor.extract(&html);
        assert_eq!(out.metrics.avg, Some(4.4));
        assert_eq!(out.metrics.count, Some(9.0));
    }
}
