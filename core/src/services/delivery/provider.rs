//! Capability every SMS provider implements

use async_trait::async_trait;

use crate::domain::value_objects::{DeliveryResult, DeliveryStatus};
use crate::errors::{DeliveryError, DomainError};

/// A single SMS delivery channel
///
/// `send_verification_otp` makes exactly one network attempt and reports
/// failure through the returned [`DeliveryResult`] rather than an error, so
/// the chain can fall through to the next provider uniformly.
#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Stable provider name used in receipts and diagnostics
    fn name(&self) -> &str;

    async fn send_verification_otp(&self, phone: &str, code: &str) -> DeliveryResult;

    /// Look up the provider-side status of a sent message
    async fn delivery_status(&self, _message_id: &str) -> Result<DeliveryStatus, DomainError> {
        Err(DeliveryError::StatusUnavailable {
            provider: self.name().to_string(),
            message: "status lookup is not supported".to_string(),
        }
        .into())
    }
}

/// SMS body carrying a verification code
pub fn verification_message(code: &str) -> String {
    format!(
        "Your verification code is: {}. Do not share this code with anyone.",
        code
    )
}
