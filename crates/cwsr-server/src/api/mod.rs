mod reviews;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Request},
    routing::get,
    Json, Router,
};
use cwsr_cache::CacheStore;
use cwsr_core::ProductIdentity;
use cwsr_scraper::{SelectionSettings, StoreClient};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn CacheStore>,
    pub client: Arc<StoreClient>,
    pub product: Arc<ProductIdentity>,
    pub selection: SelectionSettings,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(reviews_router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http().make_span_with(make_span)),
        )
        .with_state(state)
}

/// The reviews endpoint. Every response it produces, including the
/// preflight and 405, carries the JSON content type and the open CORS
/// headers.
fn reviews_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(reviews::get_reviews)
                .options(reviews::preflight)
                .fallback(reviews::method_not_allowed),
        )
        .layer(
            ServiceBuilder::new()
                .layer(overriding(
                    header::CONTENT_TYPE,
                    "application/json; charset=utf-8",
                ))
                .layer(overriding(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
                .layer(overriding(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    "GET,OPTIONS",
                ))
                .layer(overriding(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    "Content-Type",
                )),
        )
}

fn overriding(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

fn make_span(req: &Request<Body>) -> tracing::Span {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map_or("-", |id| id.0.as_str());
    tracing::info_span!(
        "request",
        method = %req.method(),
        uri = %req.uri(),
        request_id,
    )
}

async fn health() -> Json<HealthData> {
    Json(HealthData { status: "ok" })
}
