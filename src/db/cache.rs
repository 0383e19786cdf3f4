use std::fmt::Display;

use redis::{AsyncCommands, Client};

use crate::error::{AppError, AppResult};

/// Cache keys for upstream catalog responses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    MovieSearch(String),
    LatestMovies,
    MovieDetails(i64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::MovieSearch(query) => write!(f, "search:{}", query.to_lowercase()),
            CacheKey::LatestMovies => write!(f, "latest"),
            CacheKey::MovieDetails(id) => write!(f, "movie:{}", id),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Read-through cache over Redis for catalog responses
///
/// Values are stored as JSON with a per-key TTL. Callers are expected to
/// treat cache failures as misses; nothing here is load-bearing for
/// correctness, only for upstream quota and latency.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
}

impl Cache {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }

    /// Retrieves a cached value by key, `None` on a miss
    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                let value = serde_json::from_str(&json)
                    .map_err(|e| AppError::Internal(format!("Cache deserialization error: {}", e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Stores a value under the given key with a TTL in seconds
    pub async fn put<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) -> AppResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(format!("Cache serialization error: {}", e)))?;

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key.to_string(), json, ttl).await?;
        Ok(())
    }
}

/// Wraps a fallible async computation with cache lookup and store.
///
/// On a hit, the cached value is returned and the block never runs. On a miss
/// the block is evaluated, its value cached, and returned. Cache read and
/// write failures degrade to a pass-through with a warning; only the block's
/// own error propagates.
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let hit = match $cache.get(&$key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, key = %$key, "cache read failed, treating as miss");
                None
            }
        };

        match hit {
            Some(value) => Ok(value),
            None => match $block.await {
                Ok(value) => {
                    if let Err(e) = $cache.put(&$key, &value, $ttl).await {
                        tracing::warn!(error = %e, key = %$key, "cache write failed");
                    }
                    Ok(value)
                }
                Err(e) => Err(e),
            },
        }
    }};
}
