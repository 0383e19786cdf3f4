use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Movie catalog
        .route("/movies/search", get(handlers::search_movies))
        .route("/movies/latest", get(handlers::latest_movies))
        .route("/movies/:id", get(handlers::movie_details))
        // Trending searches
        .route("/trending", get(handlers::top_trending))
        // Saved movies
        .route(
            "/favorites",
            get(handlers::list_favorites).post(handlers::add_favorite),
        )
        .route("/favorites/:id", delete(handlers::remove_favorite))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
