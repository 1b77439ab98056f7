//! Redis-backed cache implementations.
//!
//! `RedisClient` owns the connection and retry behavior;
//! `RedisRevocationStore` maps the core's revocation interface onto four
//! Redis key partitions.

pub mod redis_client;
pub mod revocation_store;

pub use redis_client::RedisClient;
pub use revocation_store::RedisRevocationStore;

// Re-export commonly used types
pub use sb_shared::config::CacheConfig;
