//! Configuration module with business-specific sub-modules
//!
//! Every section is read from environment variables (after `dotenvy` has
//! loaded any `.env` file) and falls back to its `Default` when a variable
//! is missing or unparsable:
//! - `cache` - challenge store backend and Redis connection
//! - `database` - MySQL pool for the user profile store
//! - `environment` - environment detection and logging configuration
//! - `identity` - bearer token verification
//! - `otp` - challenge lifetime and attempt limits
//! - `server` - HTTP bind address
//! - `sms` - delivery provider order and fallback policy

pub mod cache;
pub mod database;
pub mod environment;
pub mod identity;
pub mod otp;
pub mod server;
pub mod sms;

use serde::{Deserialize, Serialize};

pub use cache::{CacheConfig, ChallengeStoreKind};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use identity::IdentityConfig;
pub use otp::{OtpConfig, OtpConfigError};
pub use server::ServerConfig;
pub use sms::SmsConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub otp: OtpConfig,
    pub sms: SmsConfig,
    pub identity: IdentityConfig,
    pub cache: CacheConfig,
    /// Absent when no `DATABASE_URL` is configured; profiles are then kept in memory
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            otp: OtpConfig::default(),
            sms: SmsConfig::default(),
            identity: IdentityConfig::default(),
            cache: CacheConfig::default(),
            database: None,
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            otp: OtpConfig::from_env(),
            sms: SmsConfig::from_env(),
            identity: IdentityConfig::from_env(),
            cache: CacheConfig::from_env(),
            database: DatabaseConfig::from_env_optional(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Whether issued codes may be echoed back in API responses
    pub fn expose_codes(&self) -> bool {
        self.environment.is_development()
    }
}

/// Read an environment variable and parse it, falling back to `default`
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a boolean flag; only the literal `true` (any case) or `1` enables it
pub(crate) fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"))
        .unwrap_or(false)
}
