//! # ContactVerify Infrastructure
//!
//! Concrete adapters for the seams defined in `cv_core`:
//! - **Cache**: Redis-backed challenge store shared across API instances
//! - **Database**: MySQL user profile repository using SQLx
//! - **SMS**: Twilio (REST), AWS SNS and mock providers
//! - **Identity**: JWT verification of upstream identity tokens
//!
//! ## Features
//!
//! - `mysql`: MySQL profile repository (default)
//! - `redis-cache`: Redis challenge store (default)
//! - `aws-sns`: AWS SNS SMS provider (default)

use cv_core::errors::DomainError;

/// Cache module - Redis challenge store
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Identity module - upstream token verification
pub mod identity;

/// SMS module - provider implementations
pub mod sms;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[cfg(feature = "redis-cache")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stored or received data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}
