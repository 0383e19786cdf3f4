use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{MovieDetail, MovieSummary, SearchCounterRecord};

use super::AppState;

const DEFAULT_TRENDING_LIMIT: i64 = 10;

// Request types

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: String,
}

#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    pub movie_id: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Search the catalog by title
///
/// A non-empty result set bumps the trending counter for the query as a
/// fire-and-forget side effect; the response never waits on it and never
/// fails because of it.
pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let movies = state.catalog.search(&params.q).await?;

    if let Some(top) = movies.first() {
        let trending = state.trending.clone();
        let query = params.q.clone();
        let top = top.clone();
        tokio::spawn(async move {
            trending.record_search(&query, &top).await;
        });
    }

    Ok(Json(movies))
}

/// Current most popular movies
pub async fn latest_movies(State(state): State<AppState>) -> AppResult<Json<Vec<MovieSummary>>> {
    let movies = state.catalog.list_latest().await?;
    Ok(Json(movies))
}

/// Full record for one movie
pub async fn movie_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MovieDetail>> {
    let detail = state.catalog.get_details(id).await?;
    Ok(Json(detail))
}

/// Top trending search queries, most-counted first
///
/// Always 200: an unreachable counter store renders as an empty list.
pub async fn top_trending(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> Json<Vec<SearchCounterRecord>> {
    let limit = params.limit.unwrap_or(DEFAULT_TRENDING_LIMIT);
    Json(state.trending.top_trending(limit).await)
}

/// All saved movie ids
pub async fn list_favorites(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let ids = state.favorites.get_all().await?;
    Ok(Json(ids))
}

/// Save a movie id
pub async fn add_favorite(
    State(state): State<AppState>,
    Json(request): Json<AddFavoriteRequest>,
) -> AppResult<StatusCode> {
    state.favorites.add(&request.movie_id).await?;
    Ok(StatusCode::CREATED)
}

/// Remove a saved movie id
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.favorites.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
