//! Challenge store configuration module

use serde::{Deserialize, Serialize};

/// Backend holding in-flight challenges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStoreKind {
    /// Process-local map; only valid for a single API instance
    #[default]
    Memory,
    /// Redis, shared across instances
    Redis,
}

impl std::str::FromStr for ChallengeStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(ChallengeStoreKind::Memory),
            "redis" => Ok(ChallengeStoreKind::Redis),
            other => Err(format!("Invalid challenge store: {}", other)),
        }
    }
}

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Which store backs challenges
    pub store: ChallengeStoreKind,

    /// Redis connection URL
    pub url: String,

    /// Prefix prepended to every challenge key
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            store: ChallengeStoreKind::Memory,
            url: String::from("redis://localhost:6379"),
            key_prefix: String::from("otp:challenge:"),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            store: super::env_or("CHALLENGE_STORE", defaults.store),
            url: std::env::var("REDIS_URL").unwrap_or(defaults.url),
            key_prefix: std::env::var("REDIS_KEY_PREFIX").unwrap_or(defaults.key_prefix),
        }
    }
}
