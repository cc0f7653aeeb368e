//! Database configuration module

use serde::{Deserialize, Serialize};

/// MySQL connection settings for the user profile store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout: u64,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            connect_timeout: 30,
        }
    }

    /// Create from environment variables, `None` when `DATABASE_URL` is unset
    pub fn from_env_optional() -> Option<Self> {
        let url = std::env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty())?;
        let base = Self::new(url);
        Some(Self {
            max_connections: super::env_or("DATABASE_MAX_CONNECTIONS", base.max_connections),
            connect_timeout: super::env_or("DATABASE_CONNECT_TIMEOUT", base.connect_timeout),
            ..base
        })
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}
