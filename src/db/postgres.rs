use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Connection pool for the search-counter database
///
/// Sized small: the only traffic here is counter lookups and trending reads,
/// and a bounded acquire timeout keeps a saturated pool from stalling the
/// search path indefinitely.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    Ok(pool)
}
