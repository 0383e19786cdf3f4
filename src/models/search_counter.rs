use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::MovieSummary;

/// Persisted tally of how often a search query produced a non-empty result
///
/// One record exists per unique query string (exact match, no normalization).
/// The movie fields are a snapshot of the top-ranked result at creation time
/// and are never updated by subsequent increments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct SearchCounterRecord {
    pub id: Uuid,
    /// The search term, used as the exact lookup key
    pub query: String,
    /// Number of times this query returned at least one result
    pub count: i64,
    pub movie_id: i64,
    pub title: String,
    pub poster_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SearchCounterRecord {
    /// Creates a fresh record for a query's first non-empty search
    pub fn first_hit(query: &str, top_result: &MovieSummary) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.to_string(),
            count: 1,
            movie_id: top_result.id,
            title: top_result.title.clone(),
            poster_path: top_result.poster_path.clone(),
            created_at: Utc::now(),
        }
    }
}
