use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{MovieSummary, SearchCounterRecord};

pub mod memory;
pub mod postgres;

pub use memory::MemoryCounterStore;
pub use postgres::PgCounterStore;

/// Persistence seam for search counters
///
/// Lookup is by exact query string: no trimming, no case folding. Ordered
/// reads must sort by `count DESC, created_at ASC, query ASC` so that ties
/// resolve by insertion order and the result is deterministic across calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CounterStore: Send + Sync {
    async fn find_by_query(&self, query: &str) -> AppResult<Option<SearchCounterRecord>>;

    async fn create(&self, record: &SearchCounterRecord) -> AppResult<()>;

    async fn increment_count(&self, id: uuid::Uuid) -> AppResult<()>;

    async fn list_by_count_desc(&self, limit: i64) -> AppResult<Vec<SearchCounterRecord>>;
}

/// Tracks which search queries keep producing results
///
/// Backs the "Trending Now" rail: every non-empty search bumps a per-query
/// counter, and the rail reads the top counters back out. Both operations are
/// deliberately non-fatal; trending is decoration, and the search flow must
/// never fail because the counter store is down.
#[derive(Clone)]
pub struct TrendingAggregator {
    store: Arc<dyn CounterStore>,
}

impl TrendingAggregator {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Records one non-empty search for `query`
    ///
    /// Increments the existing counter, or creates a `count = 1` record with
    /// a snapshot of `top_result` if this is the first hit for the query.
    /// The read-then-write pair is not transactional: two sessions searching
    /// the same fresh query at once can race and under-count. Accepted.
    ///
    /// Callers only invoke this after a search that returned at least one
    /// result; no emptiness check happens here. Store failures are logged
    /// and swallowed so the search flow is never interrupted.
    pub async fn record_search(&self, query: &str, top_result: &MovieSummary) {
        let outcome = match self.store.find_by_query(query).await {
            Ok(Some(existing)) => self.store.increment_count(existing.id).await,
            Ok(None) => {
                let record = SearchCounterRecord::first_hit(query, top_result);
                self.store.create(&record).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                tracing::debug!(query = %query, movie_id = top_result.id, "search recorded");
            }
            Err(e) => {
                tracing::warn!(error = %e, query = %query, "failed to record search, dropping");
            }
        }
    }

    /// Returns the top `limit` queries ordered by counter descending
    ///
    /// An unreachable store maps to an empty list, never an error.
    pub async fn top_trending(&self, limit: i64) -> Vec<SearchCounterRecord> {
        match self.store.list_by_count_desc(limit).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load trending searches, returning none");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    use crate::error::AppError;

    fn summary(id: i64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/{}.jpg", id)),
            overview: None,
            release_date: None,
            vote_average: 7.0,
        }
    }

    #[tokio::test]
    async fn test_record_search_creates_on_first_hit() {
        let mut store = MockCounterStore::new();
        store
            .expect_find_by_query()
            .with(eq("batman"))
            .times(1)
            .returning(|_| Ok(None));
        store
            .expect_create()
            .withf(|record| {
                record.query == "batman"
                    && record.count == 1
                    && record.movie_id == 268
                    && record.title == "Batman"
            })
            .times(1)
            .returning(|_| Ok(()));

        let aggregator = TrendingAggregator::new(Arc::new(store));
        aggregator.record_search("batman", &summary(268, "Batman")).await;
    }

    #[tokio::test]
    async fn test_record_search_increments_existing() {
        let existing = SearchCounterRecord::first_hit("batman", &summary(268, "Batman"));
        let existing_id = existing.id;

        let mut store = MockCounterStore::new();
        store
            .expect_find_by_query()
            .with(eq("batman"))
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        store
            .expect_increment_count()
            .with(eq(existing_id))
            .times(1)
            .returning(|_| Ok(()));
        store.expect_create().times(0);

        let aggregator = TrendingAggregator::new(Arc::new(store));
        // A different top result this time; the stored snapshot must not change
        aggregator.record_search("batman", &summary(272, "Batman Begins")).await;
    }

    #[tokio::test]
    async fn test_record_search_swallows_store_failure() {
        let mut store = MockCounterStore::new();
        store
            .expect_find_by_query()
            .returning(|_| Err(AppError::ExternalApi("counter store down".to_string())));

        let aggregator = TrendingAggregator::new(Arc::new(store));
        aggregator.record_search("batman", &summary(268, "Batman")).await;
    }

    #[tokio::test]
    async fn test_record_search_swallows_write_failure() {
        let mut store = MockCounterStore::new();
        store.expect_find_by_query().returning(|_| Ok(None));
        store
            .expect_create()
            .returning(|_| Err(AppError::ExternalApi("write refused".to_string())));

        let aggregator = TrendingAggregator::new(Arc::new(store));
        aggregator.record_search("batman", &summary(268, "Batman")).await;
    }

    #[tokio::test]
    async fn test_top_trending_maps_failure_to_empty() {
        let mut store = MockCounterStore::new();
        store
            .expect_list_by_count_desc()
            .with(eq(5))
            .returning(|_| Err(AppError::ExternalApi("unreachable".to_string())));

        let aggregator = TrendingAggregator::new(Arc::new(store));
        assert!(aggregator.top_trending(5).await.is_empty());
    }

    #[tokio::test]
    async fn test_queries_are_matched_verbatim() {
        let mut store = MockCounterStore::new();
        store
            .expect_find_by_query()
            .with(eq("  Batman "))
            .times(1)
            .returning(|_| Ok(None));
        store.expect_create().returning(|_| Ok(()));

        let aggregator = TrendingAggregator::new(Arc::new(store));
        aggregator.record_search("  Batman ", &summary(268, "Batman")).await;

        let mut id_store = MockCounterStore::new();
        id_store
            .expect_find_by_query()
            .with(eq("BATMAN"))
            .times(1)
            .returning(|_| Ok(None));
        id_store.expect_create().returning(|_| Ok(()));

        let aggregator = TrendingAggregator::new(Arc::new(id_store));
        aggregator.record_search("BATMAN", &summary(268, "Batman")).await;
    }

    #[tokio::test]
    async fn test_create_and_increment_against_memory_store() {
        let store = Arc::new(MemoryCounterStore::new());
        let aggregator = TrendingAggregator::new(store.clone());

        aggregator.record_search("batman", &summary(268, "Batman")).await;
        aggregator.record_search("batman", &summary(272, "Batman Begins")).await;

        let records = aggregator.top_trending(10).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].count, 2);
        // Snapshot fields stay frozen from the first hit
        assert_eq!(records[0].movie_id, 268);
        assert_eq!(records[0].title, "Batman");
    }
}
