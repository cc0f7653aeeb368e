//! Shared error response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Standard error response structure used across all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details: an object of named fields, or a list
    /// such as the per-provider delivery failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a named detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let Ok(json_value) = serde_json::to_value(value) else {
            return self;
        };
        match self.details.get_or_insert_with(|| Value::Object(Map::new())) {
            Value::Object(fields) => {
                fields.insert(key.into(), json_value);
            }
            other => {
                let mut fields = Map::new();
                fields.insert(key.into(), json_value);
                *other = Value::Object(fields);
            }
        }
        self
    }

    /// Replace the details with an arbitrary JSON value
    pub fn with_details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }
}

/// Error codes returned in the `error` field
pub mod error_codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const PHONE_INVALID: &str = "PHONE_INVALID";
    pub const UNSUPPORTED_COUNTRY: &str = "UNSUPPORTED_COUNTRY";
    pub const CONTACT_ALREADY_REGISTERED: &str = "CONTACT_ALREADY_REGISTERED";
    pub const CONTACT_ALREADY_VERIFIED: &str = "CONTACT_ALREADY_VERIFIED";
    pub const OTP_ALREADY_SENT: &str = "OTP_ALREADY_SENT";
    pub const OTP_NOT_FOUND: &str = "OTP_NOT_FOUND";
    pub const OTP_INVALID: &str = "OTP_INVALID";
    pub const OTP_EXPIRED: &str = "OTP_EXPIRED";
    pub const OTP_LOCKED_OUT: &str = "OTP_LOCKED_OUT";
    pub const SMS_DELIVERY_FAILED: &str = "SMS_DELIVERY_FAILED";
    pub const SMS_STATUS_UNAVAILABLE: &str = "SMS_STATUS_UNAVAILABLE";
    pub const CONFLICT: &str = "CONFLICT";
}
