//! Cache module for Redis-backed challenge storage

pub mod challenge_store;
pub mod redis_client;

pub use challenge_store::RedisChallengeStore;
pub use redis_client::{connect, mask_url};

// Re-export commonly used types
pub use cv_shared::config::CacheConfig;
