//! One-time passcode configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Digit count supported by code generation and verification
pub const SUPPORTED_CODE_LENGTH: usize = 6;

/// Longest challenge lifetime accepted: one day
pub const MAX_EXPIRATION_MINUTES: i64 = 24 * 60;

/// Invalid OTP settings detected at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpConfigError {
    #[error("OTP_EXPIRATION_MINUTES must be positive, got {0}")]
    InvalidExpiration(i64),
    #[error("OTP_EXPIRATION_MINUTES must be at most 1440 (one day), got {0}")]
    ExpirationTooLong(i64),
    #[error("OTP_MAX_ATTEMPTS must be at least 1")]
    InvalidMaxAttempts,
    #[error("OTP_LENGTH {0} is not supported; codes are 6 digits")]
    UnsupportedCodeLength(usize),
    #[error("OTP_SWEEP_INTERVAL_SECS must be positive")]
    InvalidSweepInterval,
}

/// Challenge lifetime and attempt policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Minutes a challenge stays verifiable (`OTP_EXPIRATION_MINUTES`)
    pub expiration_minutes: i64,
    /// Mismatches allowed before lockout (`OTP_MAX_ATTEMPTS`)
    pub max_attempts: u32,
    /// Code digit count (`OTP_LENGTH`)
    pub code_length: usize,
    /// Seconds between expiry sweeps (`OTP_SWEEP_INTERVAL_SECS`)
    pub sweep_interval_secs: u64,
    /// ISO 3166 alpha-2 code used for numbers without a country prefix (`DEFAULT_COUNTRY`)
    pub default_country: String,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            expiration_minutes: 10,
            max_attempts: 3,
            code_length: SUPPORTED_CODE_LENGTH,
            sweep_interval_secs: 300,
            default_country: String::from("IN"),
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            expiration_minutes: super::env_or("OTP_EXPIRATION_MINUTES", defaults.expiration_minutes),
            max_attempts: super::env_or("OTP_MAX_ATTEMPTS", defaults.max_attempts),
            code_length: super::env_or("OTP_LENGTH", defaults.code_length),
            sweep_interval_secs: super::env_or("OTP_SWEEP_INTERVAL_SECS", defaults.sweep_interval_secs),
            default_country: std::env::var("DEFAULT_COUNTRY")
                .map(|v| v.trim().to_ascii_uppercase())
                .unwrap_or(defaults.default_country),
        }
    }

    /// Reject settings the verification flow cannot honour
    pub fn validate(&self) -> Result<(), OtpConfigError> {
        if self.expiration_minutes <= 0 {
            return Err(OtpConfigError::InvalidExpiration(self.expiration_minutes));
        }
        if self.expiration_minutes > MAX_EXPIRATION_MINUTES {
            return Err(OtpConfigError::ExpirationTooLong(self.expiration_minutes));
        }
        if self.max_attempts == 0 {
            return Err(OtpConfigError::InvalidMaxAttempts);
        }
        if self.code_length != SUPPORTED_CODE_LENGTH {
            return Err(OtpConfigError::UnsupportedCodeLength(self.code_length));
        }
        if self.sweep_interval_secs == 0 {
            return Err(OtpConfigError::InvalidSweepInterval);
        }
        Ok(())
    }
}
