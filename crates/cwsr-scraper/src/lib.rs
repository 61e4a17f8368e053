//! Store page ingestion: fetch, multi-strategy extraction, normalization,
//! and top-review selection.
//!
//! Extraction runs three independent tiers in fixed precedence order:
//! JSON-LD structured data, the hydrated client-state blob, and a last-resort
//! pattern scan of the rendered markup. Each tier maps raw HTML to partial
//! metrics and review candidates; [`parse::parse_store_page`] merges them.

pub mod client;
pub mod coerce;
pub mod error;
pub mod extract;
pub mod parse;
pub mod pipeline;
pub mod sanitize;
pub mod select;

pub use client::StoreClient;
pub use error::ScraperError;
pub use parse::{parse_store_page, parse_store_page_at, ParsedPage};
pub use pipeline::{build_payload, collect_payload, SelectionSettings};
pub use select::{pick_top_reviews, pick_top_reviews_at};
