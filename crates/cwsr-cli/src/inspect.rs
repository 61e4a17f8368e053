//! Operator commands for checking the scraper against live or saved pages.
//!
//! Both commands print JSON on stdout; logs go to stderr.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use cwsr_core::{AppConfig, Metrics, Review};
use cwsr_scraper::{
    build_payload, collect_payload, parse_store_page, pick_top_reviews, ParsedPage,
    SelectionSettings, StoreClient,
};
use serde::Serialize;

/// Output of `cwsr-cli parse`.
#[derive(Debug, Serialize)]
pub(crate) struct ParseReport {
    pub rating: Metrics,
    /// Reviews found on the page after dedup.
    pub parsed: usize,
    pub reviews: Vec<Review>,
}

pub(crate) fn configured_selection(config: &AppConfig) -> SelectionSettings {
    SelectionSettings {
        window_days: config.top_reviews_window_days,
        count: config.top_reviews_count,
    }
}

/// Applies command-line overrides on top of `base`.
pub(crate) fn selection_from(
    base: SelectionSettings,
    window_days: Option<u32>,
    count: Option<usize>,
) -> SelectionSettings {
    SelectionSettings {
        window_days: window_days.unwrap_or(base.window_days),
        count: count.unwrap_or(base.count),
    }
}

/// Fetches the configured product page and prints its payload.
///
/// With `all`, every parsed review is printed instead of the selection.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the fetch fails, or the
/// page has no rating.
pub(crate) async fn run_fetch(
    config: &AppConfig,
    selection: SelectionSettings,
    all: bool,
) -> anyhow::Result<()> {
    let client = StoreClient::new(
        config.product.store_url(),
        config.request_timeout_secs,
        &config.user_agent,
    )?;

    let payload = if all {
        let html = client.fetch_page().await?;
        let page = parse_store_page(&html)?;
        build_payload(&config.product, page.metrics, page.reviews, Utc::now())
    } else {
        collect_payload(&client, &config.product, selection).await?
    };
    tracing::info!(
        store_url = %client.store_url(),
        reviews = payload.reviews.len(),
        "payload ready"
    );

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// Parses a saved page and prints a [`ParseReport`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or the page has no rating.
pub(crate) fn run_parse(file: &Path, selection: SelectionSettings) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let page = parse_store_page(&html)
        .with_context(|| format!("no usable rating in {}", file.display()))?;
    let report = build_report(&page, selection);
    tracing::info!(
        file = %file.display(),
        parsed = report.parsed,
        selected = report.reviews.len(),
        "parsed saved page"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn build_report(page: &ParsedPage, selection: SelectionSettings) -> ParseReport {
    let reviews = pick_top_reviews(&page.reviews, selection.window_days, selection.count);
    ParseReport {
        rating: page.metrics,
        parsed: page.reviews.len(),
        reviews,
    }
}
