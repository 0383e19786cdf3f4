use crate::error::AppResult;
use crate::models::{MovieDetail, MovieSummary};

pub mod tmdb;

pub use tmdb::TmdbCatalog;

/// Movie catalog abstraction
///
/// The single upstream seam for movie metadata. Screens and handlers only
/// ever see this trait; the concrete provider (TMDB today) is injected at
/// startup so tests can substitute a stub or mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Search for movies by title
    ///
    /// Fails with invalid input on an empty or whitespace-only query.
    async fn search(&self, query: &str) -> AppResult<Vec<MovieSummary>>;

    /// List the current most popular movies
    async fn list_latest(&self) -> AppResult<Vec<MovieSummary>>;

    /// Fetch the full record for one movie
    ///
    /// Fails with not-found when the catalog has no movie with this id.
    async fn get_details(&self, id: i64) -> AppResult<MovieDetail>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
