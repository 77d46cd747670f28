use std::sync::Arc;
use std::time::Duration;

use cinematch_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, Cache},
    services::{HttpEmbedder, LetterboxdScraper, Recommender, RecommenderSettings, TmdbProvider},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinematch_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let (cache, cache_writer) = match &config.redis_url {
        Some(redis_url) => {
            let (cache, handle) = Cache::new(create_redis_client(redis_url)?).await;
            tracing::info!("Redis cache enabled");
            (cache, Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, caching disabled");
            (Cache::disabled(), None)
        }
    };

    let history = LetterboxdScraper::new(config.letterboxd_url.clone())?;
    let movie_db = TmdbProvider::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    );
    let embedder = HttpEmbedder::new(
        config.embedding_api_url.clone(),
        config.embedding_api_key.clone(),
        config.embedding_model.clone(),
    );

    let settings = RecommenderSettings {
        request_delay: Duration::from_millis(config.tmdb_request_delay_ms),
        ..RecommenderSettings::default()
    };
    let recommender = Recommender::new(
        Arc::new(history),
        Arc::new(movie_db),
        Arc::new(embedder),
        settings,
    );

    let app = create_router(Arc::new(AppState::new(recommender)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(address = %config.bind_addr(), model = %config.embedding_model, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
