use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::MovieSummary;
use crate::services::catalog::MovieCatalog;
use crate::services::fetch::{FetchSnapshot, FetchState, SharedError};
use crate::services::trending::TrendingAggregator;

/// The search-screen flow with the rendering stripped away
///
/// Owns a fetch controller over `MovieCatalog::search` for the session's
/// current query. Submitting an empty query resets the controller instead of
/// searching; a successful non-empty search records the query with the
/// trending aggregator as a side effect, after the results are already in.
pub struct SearchSession {
    trending: TrendingAggregator,
    query: Arc<RwLock<String>>,
    results: FetchState<Vec<MovieSummary>>,
}

impl SearchSession {
    pub fn new(catalog: Arc<dyn MovieCatalog>, trending: TrendingAggregator) -> Self {
        let query = Arc::new(RwLock::new(String::new()));

        let producer = {
            let catalog = catalog.clone();
            let query = query.clone();
            move || {
                let catalog = catalog.clone();
                let query = query.clone();
                async move {
                    let current = query.read().await.clone();
                    catalog.search(&current).await
                }
            }
        };

        Self {
            trending,
            query,
            // The screen starts on an empty box; nothing to fetch yet
            results: FetchState::new(producer, false),
        }
    }

    /// Runs one search for `query`, updating shared state along the way
    ///
    /// Returns the result list so callers can sequence follow-up work.
    /// Trending bookkeeping only happens when the search came back non-empty,
    /// and its failures never surface here.
    pub async fn submit(&self, query: &str) -> Result<Vec<MovieSummary>, SharedError> {
        if query.trim().is_empty() {
            self.query.write().await.clear();
            self.results.reset();
            return Ok(Vec::new());
        }

        *self.query.write().await = query.to_string();
        let movies = self.results.refetch().await?;

        if let Some(top) = movies.first() {
            self.trending.record_search(query, top).await;
        }

        Ok(movies)
    }

    /// Current `{data, loading, error}` view for rendering
    pub fn results(&self) -> FetchSnapshot<Vec<MovieSummary>> {
        self.results.snapshot()
    }

    /// The query text the session last searched for
    pub async fn current_query(&self) -> String {
        self.query.read().await.clone()
    }

    /// Discards any in-flight search on the way out
    pub fn teardown(&self) {
        self.results.teardown();
    }
}

/// Convenience producer for the trending rail's fetch controller
///
/// The home screen loads trending tiles through the same `FetchState`
/// machinery as every other remote read; `top_trending` itself never fails,
/// so this producer is infallible in practice.
pub fn trending_producer(
    trending: TrendingAggregator,
    limit: i64,
) -> impl Fn() -> std::pin::Pin<
    Box<dyn std::future::Future<Output = AppResult<Vec<crate::models::SearchCounterRecord>>> + Send>,
> + Send
       + Sync {
    move || {
        let trending = trending.clone();
        Box::pin(async move { Ok(trending.top_trending(limit).await) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::AppError;
    use crate::services::catalog::MockMovieCatalog;
    use crate::services::trending::MemoryCounterStore;

    fn summary(id: i64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            poster_path: None,
            overview: None,
            release_date: None,
            vote_average: 6.5,
        }
    }

    fn aggregator() -> (TrendingAggregator, Arc<MemoryCounterStore>) {
        let store = Arc::new(MemoryCounterStore::new());
        (TrendingAggregator::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_submit_records_search_on_non_empty_result() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search()
            .returning(|_| Ok(vec![summary(268, "Batman"), summary(272, "Batman Begins")]));

        let (trending, _) = aggregator();
        let session = SearchSession::new(Arc::new(catalog), trending.clone());

        let movies = session.submit("batman").await.unwrap();
        assert_eq!(movies.len(), 2);

        let records = trending.top_trending(10).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].query, "batman");
        assert_eq!(records[0].movie_id, 268);

        let snap = session.results();
        assert_eq!(snap.data.map(|d| d.len()), Some(2));
    }

    #[tokio::test]
    async fn test_submit_empty_result_records_nothing() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_search().returning(|_| Ok(Vec::new()));

        let (trending, _) = aggregator();
        let session = SearchSession::new(Arc::new(catalog), trending.clone());

        let movies = session.submit("zzzzzz").await.unwrap();
        assert!(movies.is_empty());
        assert!(trending.top_trending(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_resets_instead_of_searching() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search()
            .times(1)
            .returning(|_| Ok(vec![summary(268, "Batman")]));

        let (trending, _) = aggregator();
        let session = SearchSession::new(Arc::new(catalog), trending);

        session.submit("batman").await.unwrap();
        assert!(session.results().data.is_some());

        session.submit("   ").await.unwrap();
        let snap = session.results();
        assert!(snap.data.is_none());
        assert!(snap.error.is_none());
        assert!(!snap.loading);
        assert_eq!(session.current_query().await, "");
    }

    #[tokio::test]
    async fn test_search_failure_surfaces_and_records_nothing() {
        let mut catalog = MockMovieCatalog::new();
        catalog
            .expect_search()
            .returning(|_| Err(AppError::ExternalApi("tmdb down".to_string())));

        let (trending, _) = aggregator();
        let session = SearchSession::new(Arc::new(catalog), trending.clone());

        assert!(session.submit("batman").await.is_err());
        assert!(session.results().error.is_some());
        assert!(trending.top_trending(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_trending_producer_feeds_fetch_state() {
        let (trending, store) = aggregator();
        TrendingAggregator::new(store.clone())
            .record_search("batman", &summary(268, "Batman"))
            .await;

        let rail = FetchState::new(trending_producer(trending, 5), false);
        let records = rail.refetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(rail.snapshot().data.map(|d| d.len()), Some(1));
    }
}
