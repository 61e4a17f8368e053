mod api;
mod middleware;

use std::sync::Arc;

use cwsr_cache::{CacheStore, MemoryCacheStore, PgCacheStore, PoolConfig};
use cwsr_core::AppConfig;
use cwsr_scraper::{SelectionSettings, StoreClient};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = cwsr_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cache = build_cache(&config).await?;
    let client = StoreClient::new(
        config.product.store_url(),
        config.request_timeout_secs,
        &config.user_agent,
    )?;

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        store_url = %client.store_url(),
        cache = cache.name(),
        "starting reviews server"
    );

    let state = AppState {
        cache,
        client: Arc::new(client),
        product: Arc::new(config.product.clone()),
        selection: SelectionSettings {
            window_days: config.top_reviews_window_days,
            count: config.top_reviews_count,
        },
        cache_ttl_secs: config.cache_ttl_secs,
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn build_cache(config: &AppConfig) -> anyhow::Result<Arc<dyn CacheStore>> {
    match config.database_url.as_deref() {
        Some(url) => {
            let store = PgCacheStore::connect(url, PoolConfig::default()).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; cached payloads will not survive restarts");
            Ok(Arc::new(MemoryCacheStore::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
