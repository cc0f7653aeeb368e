//! Error kinds for the contact verification flow
//!
//! Messages are plain English; the HTTP layer picks status codes and
//! machine-readable codes from the variant, never from the text.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Malformed or missing request input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    RequiredField { field: String },

    #[error("{field} has an invalid format")]
    InvalidFormat { field: String },

    #[error("OTP must be a 6-digit number")]
    InvalidOtpFormat,
}

/// Phone normalization and formatting failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    #[error("Invalid phone number format: {phone}")]
    InvalidNumber { phone: String },

    #[error("Unsupported country code: {code}")]
    UnsupportedCountry { code: String },

    #[error("Phone number cannot be formatted: {phone}")]
    UnsupportedFormat { phone: String },
}

/// Challenge lifecycle failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("No OTP found. Please request a new OTP.")]
    NoActiveChallenge,

    #[error("OTP already sent. Please wait {remaining_minutes} minutes before requesting a new one.")]
    ChallengeInFlight {
        remaining_minutes: i64,
        expires_at: DateTime<Utc>,
    },

    #[error("Invalid OTP. {attempts_remaining} attempts remaining.")]
    InvalidCode { attempts_remaining: u32 },

    #[error("OTP has expired. Please request a new OTP.")]
    Expired,

    #[error("Maximum verification attempts exceeded. Please request a new OTP.")]
    LockedOut,

    #[error("Contact number is already verified")]
    AlreadyVerified,
}

/// One provider's failed delivery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFailure {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub message: String,
}

/// SMS delivery failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Failed to send OTP via all SMS providers")]
    AllProvidersFailed { failures: Vec<ProviderFailure> },

    #[error("No SMS provider is configured")]
    NoProviders,

    #[error("Delivery status lookup failed via {provider}: {message}")]
    StatusUnavailable { provider: String, message: String },
}

impl DeliveryError {
    /// Per-provider diagnostics, empty for non-aggregate failures
    pub fn failures(&self) -> &[ProviderFailure] {
        match self {
            DeliveryError::AllProvidersFailed { failures } => failures,
            _ => &[],
        }
    }
}
