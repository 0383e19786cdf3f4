//! TMDB catalog provider
//!
//! Talks to The Movie Database REST API with a v4 read access token.
//! Responses are cached in Redis: list endpoints briefly (popularity moves),
//! details for a day (near-immutable). Cache trouble degrades to an upstream
//! call, never to a request failure.

use reqwest::{Client as HttpClient, StatusCode};

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieDetail, MovieSummary, TmdbMovieDetails, TmdbPage},
    services::catalog::MovieCatalog,
};

const SEARCH_CACHE_TTL: u64 = 600; // 10 minutes
const LATEST_CACHE_TTL: u64 = 1800; // 30 minutes
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl TmdbCatalog {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            cache,
        }
    }

    async fn fetch_page(&self, url: String, query: &[(&str, &str)]) -> AppResult<Vec<MovieSummary>> {
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        let page: TmdbPage = response.json().await?;
        Ok(page.results.into_iter().map(MovieSummary::from).collect())
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn search(&self, query: &str) -> AppResult<Vec<MovieSummary>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::MovieSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let url = format!("{}/search/movie", self.api_url);
                let movies = self.fetch_page(url, &[("query", query)]).await?;

                tracing::info!(
                    query = %query,
                    results = movies.len(),
                    provider = "tmdb",
                    "Movie search completed"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    async fn list_latest(&self) -> AppResult<Vec<MovieSummary>> {
        cached!(
            self.cache,
            CacheKey::LatestMovies,
            LATEST_CACHE_TTL,
            async move {
                let url = format!("{}/discover/movie", self.api_url);
                let movies = self
                    .fetch_page(url, &[("sort_by", "popularity.desc")])
                    .await?;

                tracing::info!(
                    results = movies.len(),
                    provider = "tmdb",
                    "Latest movies fetched"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    async fn get_details(&self, id: i64) -> AppResult<MovieDetail> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(id),
            DETAILS_CACHE_TTL,
            async move {
                let url = format!("{}/movie/{}", self.api_url, id);
                let response = self
                    .http_client
                    .get(&url)
                    .bearer_auth(&self.api_key)
                    .send()
                    .await?;

                if response.status() == StatusCode::NOT_FOUND {
                    return Err(AppError::NotFound(format!("No movie with id {}", id)));
                }

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::ExternalApi(format!(
                        "TMDB returned status {}: {}",
                        status, body
                    )));
                }

                let details: TmdbMovieDetails = response.json().await?;

                tracing::info!(movie_id = id, provider = "tmdb", "Movie details fetched");

                Ok(MovieDetail::from(details))
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
