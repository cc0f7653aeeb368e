//! Mock SMS provider for development and tests
//!
//! Records every message instead of sending it. Failures can be switched
//! on at runtime to exercise the fallback path.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::info;

use cv_core::domain::value_objects::{DeliveryResult, DeliveryStatus};
use cv_core::errors::DomainError;
use cv_core::services::delivery::SmsProvider;
use cv_shared::utils::phone::mask_phone_number;

pub const PROVIDER_NAME: &str = "mock";

/// A message captured by the mock provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: String,
    pub phone: String,
    pub code: String,
    pub sent_at: DateTime<Utc>,
}

pub struct MockSmsProvider {
    name: String,
    failing: AtomicBool,
    counter: AtomicU64,
    sent: Mutex<Vec<SentMessage>>,
}

impl Default for MockSmsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSmsProvider {
    pub fn new() -> Self {
        Self::named(PROVIDER_NAME)
    }

    /// A mock registered under another name, e.g. to stand in for a real provider
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            failing: AtomicBool::new(false),
            counter: AtomicU64::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Make subsequent sends fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Code most recently sent to `phone`
    pub async fn last_code_for(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|m| m.phone == phone)
            .map(|m| m.code.clone())
    }
}

#[async_trait]
impl SmsProvider for MockSmsProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_verification_otp(&self, phone: &str, code: &str) -> DeliveryResult {
        if self.failing.load(Ordering::SeqCst) {
            return DeliveryResult::failed(Some("MOCK_FAILURE".to_string()), "mock provider set to fail");
        }

        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let message_id = format!("{}-{:06}", self.name, n);
        self.sent.lock().await.push(SentMessage {
            message_id: message_id.clone(),
            phone: phone.to_string(),
            code: code.to_string(),
            sent_at: Utc::now(),
        });

        info!(
            event = "mock_sms_sent",
            provider = %self.name,
            phone = %mask_phone_number(phone),
            message_id = %message_id,
            "Mock SMS recorded"
        );
        DeliveryResult::sent(message_id)
    }

    async fn delivery_status(&self, message_id: &str) -> Result<DeliveryStatus, DomainError> {
        let sent = self.sent.lock().await;
        let message = sent
            .iter()
            .find(|m| m.message_id == message_id)
            .ok_or_else(|| DomainError::not_found(format!("message '{}'", message_id)))?;

        Ok(DeliveryStatus {
            message_id: message.message_id.clone(),
            provider: self.name.clone(),
            status: "delivered".to_string(),
            date_created: Some(message.sent_at),
            date_sent: Some(message.sent_at),
            date_updated: Some(message.sent_at),
            error_code: None,
            error_message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_messages() {
        let mock = MockSmsProvider::new();
        let result = mock.send_verification_otp("+919876543210", "482913").await;
        assert!(result.success);
        assert_eq!(result.provider_message_id.as_deref(), Some("mock-000001"));
        assert_eq!(mock.last_code_for("+919876543210").await.as_deref(), Some("482913"));
        assert_eq!(mock.sent_messages().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_toggle() {
        let mock = MockSmsProvider::named("twilio");
        mock.set_failing(true);
        let result = mock.send_verification_otp("+919876543210", "482913").await;
        assert!(!result.success);
        assert_eq!(result.error_code.as_deref(), Some("MOCK_FAILURE"));
        assert!(mock.sent_messages().await.is_empty());

        mock.set_failing(false);
        assert!(mock.send_verification_otp("+919876543210", "482913").await.success);
    }

    #[tokio::test]
    async fn test_delivery_status_of_recorded_message() {
        let mock = MockSmsProvider::new();
        let sent = mock.send_verification_otp("+14155550123", "111222").await;
        let id = sent.provider_message_id.unwrap();

        let status = mock.delivery_status(&id).await.unwrap();
        assert_eq!(status.status, "delivered");
        assert_eq!(status.provider, "mock");

        assert!(matches!(
            mock.delivery_status("mock-999999").await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
