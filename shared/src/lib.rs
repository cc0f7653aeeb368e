//! Shared utilities and common types for the ContactVerify server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error response structures
//! - Utility functions (phone masking, code validation)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, ChallengeStoreKind, DatabaseConfig, Environment, IdentityConfig,
    LogFormat, LoggingConfig, OtpConfig, ServerConfig, SmsConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::{phone, validation};
