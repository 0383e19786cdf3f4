use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::SearchCounterRecord;
use crate::services::trending::CounterStore;

/// In-memory counter store
///
/// Keyed by exact query string. Used by the endpoint tests and by
/// deployments that run without Postgres; implements the same ordering rule
/// as the SQL store.
#[derive(Default)]
pub struct MemoryCounterStore {
    records: RwLock<HashMap<String, SearchCounterRecord>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CounterStore for MemoryCounterStore {
    async fn find_by_query(&self, query: &str) -> AppResult<Option<SearchCounterRecord>> {
        let records = self.records.read().await;
        Ok(records.get(query).cloned())
    }

    async fn create(&self, record: &SearchCounterRecord) -> AppResult<()> {
        let mut records = self.records.write().await;
        records.insert(record.query.clone(), record.clone());
        Ok(())
    }

    async fn increment_count(&self, id: Uuid) -> AppResult<()> {
        let mut records = self.records.write().await;
        if let Some(record) = records.values_mut().find(|r| r.id == id) {
            record.count += 1;
        }
        Ok(())
    }

    async fn list_by_count_desc(&self, limit: i64) -> AppResult<Vec<SearchCounterRecord>> {
        let records = self.records.read().await;
        let mut all: Vec<SearchCounterRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.query.cmp(&b.query))
        });
        all.truncate(limit.max(0) as usize);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn record(query: &str, count: i64, age_secs: i64) -> SearchCounterRecord {
        SearchCounterRecord {
            id: Uuid::new_v4(),
            query: query.to_string(),
            count,
            movie_id: 1,
            title: query.to_string(),
            poster_path: None,
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[tokio::test]
    async fn test_find_is_exact_match() {
        let store = MemoryCounterStore::new();
        store.create(&record("batman", 1, 0)).await.unwrap();

        assert!(store.find_by_query("batman").await.unwrap().is_some());
        assert!(store.find_by_query("Batman").await.unwrap().is_none());
        assert!(store.find_by_query("batman ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_increment_unknown_id_is_a_noop() {
        let store = MemoryCounterStore::new();
        store.create(&record("batman", 1, 0)).await.unwrap();
        store.increment_count(Uuid::new_v4()).await.unwrap();

        let found = store.find_by_query("batman").await.unwrap().unwrap();
        assert_eq!(found.count, 1);
    }

    #[tokio::test]
    async fn test_list_orders_by_count_then_insertion() {
        let store = MemoryCounterStore::new();
        // Counts [3, 1, 4, 1, 5, 9]; the older count-1 record sorts first
        store.create(&record("alien", 3, 60)).await.unwrap();
        store.create(&record("blade", 1, 50)).await.unwrap();
        store.create(&record("coco", 4, 40)).await.unwrap();
        store.create(&record("dune", 1, 30)).await.unwrap();
        store.create(&record("elf", 5, 20)).await.unwrap();
        store.create(&record("fargo", 9, 10)).await.unwrap();

        let top = store.list_by_count_desc(5).await.unwrap();
        let counts: Vec<i64> = top.iter().map(|r| r.count).collect();
        assert_eq!(counts, vec![9, 5, 4, 3, 1]);
        assert_eq!(top[4].query, "blade");
    }

    #[tokio::test]
    async fn test_list_with_zero_limit() {
        let store = MemoryCounterStore::new();
        store.create(&record("batman", 1, 0)).await.unwrap();
        assert!(store.list_by_count_desc(0).await.unwrap().is_empty());
    }
}
