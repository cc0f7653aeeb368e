//! Request and response bodies for the verification endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use cv_core::domain::entities::UserProfile;
use cv_core::domain::value_objects::DeliveryStatus;
use cv_core::errors::ProviderFailure;
use cv_core::services::verification::StartVerificationResult;

/// Body of `PUT /auth/contact`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    #[validate(length(min = 1, max = 32))]
    pub contact_number: String,
}

/// Body of `POST /auth/verify-otp`
///
/// The code format is checked by the service so malformed codes never
/// reach the challenge store.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

/// Query of `GET /auth/otp-status/{messageId}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtpStatusQuery {
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: UserProfile,
}

impl ProfileResponse {
    pub fn new(profile: UserProfile) -> Self {
        Self { success: true, profile }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    pub expires_at: DateTime<Utc>,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub sent_to: String,
    /// Only present in development
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_providers: Vec<ProviderFailure>,
}

impl From<StartVerificationResult> for SendOtpResponse {
    fn from(result: StartVerificationResult) -> Self {
        Self {
            success: true,
            message: format!("OTP sent successfully to {}", result.sent_to),
            expires_at: result.expires_at,
            provider: result.provider,
            message_id: result.message_id,
            sent_to: result.sent_to,
            otp: result.code,
            failed_providers: result.failed_attempts,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
    pub profile: UserProfile,
}

impl VerifyOtpResponse {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            success: true,
            message: "Contact number verified successfully".to_string(),
            profile,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpStatusResponse {
    pub success: bool,
    pub provider: String,
    pub message_id: String,
    pub status: String,
    pub date_created: Option<DateTime<Utc>>,
    pub date_sent: Option<DateTime<Utc>>,
    pub date_updated: Option<DateTime<Utc>>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

impl From<DeliveryStatus> for OtpStatusResponse {
    fn from(status: DeliveryStatus) -> Self {
        Self {
            success: true,
            provider: status.provider,
            message_id: status.message_id,
            status: status.status,
            date_created: status.date_created,
            date_sent: status.date_sent,
            date_updated: status.date_updated,
            error_code: status.error_code,
            error_message: status.error_message,
        }
    }
}
