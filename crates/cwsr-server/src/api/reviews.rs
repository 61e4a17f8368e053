//! `GET /`: serve the freshest payload available.
//!
//! Each request attempts a live refresh. A successful refresh is cached and
//! returned; a failed one falls back to the last cached payload flagged
//! `stale`, and only with no cached payload does the endpoint fail.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cwsr_cache::{read_payload, write_payload};
use cwsr_core::ReviewsPayload;
use cwsr_scraper::collect_payload;
use serde::Serialize;

use super::AppState;

/// Terminal state of one reviews request.
#[derive(Debug)]
pub(super) enum ReviewsOutcome {
    Fresh(ReviewsPayload),
    Stale(ReviewsPayload),
    Unavailable,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for ReviewsOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Fresh(payload) | Self::Stale(payload) => {
                (StatusCode::OK, Json(payload)).into_response()
            }
            Self::Unavailable => error_response(StatusCode::BAD_GATEWAY, "Unable to load reviews"),
        }
    }
}

fn error_response(status: StatusCode, message: &'static str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

pub(super) async fn get_reviews(State(state): State<AppState>) -> ReviewsOutcome {
    resolve(&state).await
}

pub(super) async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub(super) async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Runs the read-cache, refresh, write-cache sequence.
///
/// The cache is read before the refresh so a failed refresh can still be
/// answered. Cache errors are logged inside the helpers and never surface.
pub(super) async fn resolve(state: &AppState) -> ReviewsOutcome {
    let key = state.product.cache_key();
    let cached = read_payload(state.cache.as_ref(), &key).await;

    match collect_payload(&state.client, &state.product, state.selection).await {
        Ok(payload) => {
            write_payload(state.cache.as_ref(), &key, &payload, state.cache_ttl_secs).await;
            ReviewsOutcome::Fresh(payload)
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                serving_stale = cached.is_some(),
                "reviews refresh failed"
            );
            cached.map_or(ReviewsOutcome::Unavailable, |payload| {
                ReviewsOutcome::Stale(payload.into_stale())
            })
        }
    }
}

#[cfg(test)]
#[path = "reviews_test.rs"]
mod tests;
