pub mod cache;
pub mod postgres;

pub use cache::create_redis_client;
pub use cache::Cache;
pub use cache::CacheKey;
pub use postgres::create_pool;
