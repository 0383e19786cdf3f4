use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::SearchCounterRecord;
use crate::services::trending::CounterStore;

/// Postgres-backed counter store over the `search_counters` table
///
/// The aggregator's find/create/increment calls map one-to-one onto queries
/// here; the lost-update race between concurrent sessions lives at the
/// aggregator level and is not papered over with an upsert.
pub struct PgCounterStore {
    pool: PgPool,
}

impl PgCounterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CounterStore for PgCounterStore {
    async fn find_by_query(&self, query: &str) -> AppResult<Option<SearchCounterRecord>> {
        let record = sqlx::query_as::<_, SearchCounterRecord>(
            r#"
            SELECT id, query, count, movie_id, title, poster_path, created_at
            FROM search_counters
            WHERE query = $1
            "#,
        )
        .bind(query)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn create(&self, record: &SearchCounterRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO search_counters (id, query, count, movie_id, title, poster_path, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id)
        .bind(&record.query)
        .bind(record.count)
        .bind(record.movie_id)
        .bind(&record.title)
        .bind(&record.poster_path)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn increment_count(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE search_counters SET count = count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_by_count_desc(&self, limit: i64) -> AppResult<Vec<SearchCounterRecord>> {
        let records = sqlx::query_as::<_, SearchCounterRecord>(
            r#"
            SELECT id, query, count, movie_id, title, poster_path, created_at
            FROM search_counters
            ORDER BY count DESC, created_at ASC, query ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
