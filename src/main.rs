use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use marquee::api::{create_router, AppState};
use marquee::config::Config;
use marquee::db::{self, Cache};
use marquee::services::catalog::TmdbCatalog;
use marquee::services::favorites::JsonFavoritesStore;
use marquee::services::trending::{PgCounterStore, TrendingAggregator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    sqlx::migrate!().run(&pool).await?;

    let redis_client = db::create_redis_client(&config.redis_url)?;
    let cache = Cache::new(redis_client);

    let catalog = Arc::new(TmdbCatalog::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));
    let trending = TrendingAggregator::new(Arc::new(PgCounterStore::new(pool)));
    let favorites = Arc::new(JsonFavoritesStore::new(&config.favorites_path));

    let state = AppState::new(catalog, trending, favorites);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
