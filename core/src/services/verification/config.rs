//! Configuration for the verification service

use cv_shared::config::OtpConfig;

use crate::domain::entities::{DEFAULT_EXPIRATION_MINUTES, DEFAULT_MAX_ATTEMPTS};
use crate::errors::PhoneError;
use crate::services::phone::Country;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Minutes before a challenge expires
    pub code_expiration_minutes: i64,
    /// Mismatches allowed before lockout
    pub max_attempts: u32,
    /// Country assumed for numbers without a calling code
    pub default_country: Country,
    /// Echo issued codes in start results (development only)
    pub expose_code: bool,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            default_country: Country::India,
            expose_code: false,
        }
    }
}

impl VerificationServiceConfig {
    /// Build from the shared OTP settings
    pub fn from_otp_config(otp: &OtpConfig, expose_code: bool) -> Result<Self, PhoneError> {
        Ok(Self {
            code_expiration_minutes: otp.expiration_minutes,
            max_attempts: otp.max_attempts,
            default_country: otp.default_country.parse()?,
            expose_code,
        })
    }
}
