//! Ordered delivery across providers with optional fallback

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use cv_shared::utils::phone::mask_phone_number;

use super::provider::SmsProvider;
use crate::domain::value_objects::{DeliveryReceipt, DeliveryResult, DeliveryStatus};
use crate::errors::{DeliveryError, DomainError, ProviderFailure};

/// Error code recorded when a provider exceeds its time budget
pub const TIMEOUT_ERROR_CODE: &str = "TIMEOUT";

/// How the chain treats provider failures
#[derive(Debug, Clone)]
pub struct DeliveryPolicy {
    /// Try the next provider when one fails
    pub fallback_enabled: bool,
    /// Time budget for a single provider call; elapsing counts as failure
    pub provider_timeout: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            fallback_enabled: false,
            provider_timeout: Duration::from_secs(30),
        }
    }
}

/// Deliver `code` to `phone` through `providers` in order
///
/// The first provider is always tried. Later providers are tried only while
/// `policy.fallback_enabled` holds. When every tried provider fails the
/// error lists each attempt.
pub async fn deliver(
    phone: &str,
    code: &str,
    providers: &[Arc<dyn SmsProvider>],
    policy: &DeliveryPolicy,
) -> Result<DeliveryReceipt, DeliveryError> {
    if providers.is_empty() {
        return Err(DeliveryError::NoProviders);
    }

    let mut failures: Vec<ProviderFailure> = Vec::new();
    for (index, provider) in providers.iter().enumerate() {
        if index > 0 && !policy.fallback_enabled {
            break;
        }

        let result = send_with_timeout(provider.as_ref(), phone, code, policy.provider_timeout).await;
        if result.success {
            info!(
                event = "otp_sent",
                provider = provider.name(),
                phone = %mask_phone_number(phone),
                fallback = index > 0,
                "Verification code delivered"
            );
            return Ok(DeliveryReceipt {
                provider: provider.name().to_string(),
                result,
                failed_attempts: failures,
            });
        }

        let failure = result.to_failure(provider.name());
        warn!(
            event = "sms_provider_failed",
            provider = provider.name(),
            phone = %mask_phone_number(phone),
            error_code = failure.error_code.as_deref().unwrap_or("-"),
            error = %failure.message,
            "SMS provider failed to deliver verification code"
        );
        failures.push(failure);
    }

    Err(DeliveryError::AllProvidersFailed { failures })
}

async fn send_with_timeout(
    provider: &dyn SmsProvider,
    phone: &str,
    code: &str,
    timeout: Duration,
) -> DeliveryResult {
    match tokio::time::timeout(timeout, provider.send_verification_otp(phone, code)).await {
        Ok(result) => result,
        Err(_) => DeliveryResult::failed(
            Some(TIMEOUT_ERROR_CODE.to_string()),
            format!("no response within {}s", timeout.as_secs()),
        ),
    }
}

/// Provider list bundled with its policy
#[derive(Clone)]
pub struct DeliveryChain {
    providers: Vec<Arc<dyn SmsProvider>>,
    policy: DeliveryPolicy,
}

impl DeliveryChain {
    pub fn new(providers: Vec<Arc<dyn SmsProvider>>, policy: DeliveryPolicy) -> Self {
        Self { providers, policy }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn policy(&self) -> &DeliveryPolicy {
        &self.policy
    }

    pub async fn deliver(&self, phone: &str, code: &str) -> Result<DeliveryReceipt, DeliveryError> {
        deliver(phone, code, &self.providers, &self.policy).await
    }

    /// Status of a sent message from `provider`, or from the primary when unnamed
    ///
    /// Read-only; never touches challenge state.
    pub async fn delivery_status(
        &self,
        message_id: &str,
        provider: Option<&str>,
    ) -> Result<DeliveryStatus, DomainError> {
        let selected = match provider {
            Some(name) => self
                .providers
                .iter()
                .find(|p| p.name().eq_ignore_ascii_case(name))
                .ok_or_else(|| DomainError::not_found(format!("SMS provider '{}'", name)))?,
            None => self.providers.first().ok_or(DeliveryError::NoProviders)?,
        };
        selected.delivery_status(message_id).await
    }
}

impl std::fmt::Debug for DeliveryChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryChain")
            .field("providers", &self.provider_names())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedProvider {
        name: &'static str,
        succeed: bool,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(name: &'static str, succeed: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                succeed,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(name: &'static str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                name,
                succeed: true,
                delay,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SmsProvider for ScriptedProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn send_verification_otp(&self, _phone: &str, _code: &str) -> DeliveryResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.succeed {
                DeliveryResult::sent(format!("{}-msg", self.name))
            } else {
                DeliveryResult::failed(Some("E1".into()), format!("{} unavailable", self.name))
            }
        }
    }

    fn policy(fallback_enabled: bool) -> DeliveryPolicy {
        DeliveryPolicy {
            fallback_enabled,
            provider_timeout: Duration::from_secs(30),
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let primary = ScriptedProvider::new("primary", true);
        let backup = ScriptedProvider::new("backup", true);
        let providers: Vec<Arc<dyn SmsProvider>> = vec![primary.clone(), backup.clone()];

        let receipt = deliver("+919876543210", "123456", &providers, &policy(true)).await.unwrap();
        assert_eq!(receipt.provider, "primary");
        assert_eq!(receipt.message_id(), Some("primary-msg"));
        assert_eq!(backup.calls(), 0);
    }

    #[tokio::test]
    async fn test_fallback_used_when_enabled() {
        let primary = ScriptedProvider::new("primary", false);
        let backup = ScriptedProvider::new("backup", true);
        let providers: Vec<Arc<dyn SmsProvider>> = vec![primary.clone(), backup.clone()];

        let receipt = deliver("+919876543210", "123456", &providers, &policy(true)).await.unwrap();
        assert!(receipt.result.success);
        assert_eq!(receipt.provider, "backup");
        assert_eq!(receipt.failed_attempts.len(), 1);
        assert_eq!(receipt.failed_attempts[0].provider, "primary");
    }

    #[tokio::test]
    async fn test_fallback_disabled_returns_aggregate_failure() {
        let primary = ScriptedProvider::new("primary", false);
        let backup = ScriptedProvider::new("backup", true);
        let providers: Vec<Arc<dyn SmsProvider>> = vec![primary.clone(), backup.clone()];

        let err = deliver("+919876543210", "123456", &providers, &policy(false)).await.unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert_eq!(backup.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_failures_are_reported() {
        let providers: Vec<Arc<dyn SmsProvider>> = vec![
            ScriptedProvider::new("primary", false),
            ScriptedProvider::new("secondary", false),
            ScriptedProvider::new("tertiary", false),
        ];

        let err = deliver("+919876543210", "123456", &providers, &policy(true)).await.unwrap_err();
        let names: Vec<&str> = err.failures().iter().map(|f| f.provider.as_str()).collect();
        assert_eq!(names, vec!["primary", "secondary", "tertiary"]);
        assert!(err.failures().iter().all(|f| f.error_code.as_deref() == Some("E1")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failure_and_falls_back() {
        let slow = ScriptedProvider::slow("slow", Duration::from_secs(45));
        let backup = ScriptedProvider::new("backup", true);
        let providers: Vec<Arc<dyn SmsProvider>> = vec![slow.clone(), backup.clone()];

        let receipt = deliver("+919876543210", "123456", &providers, &policy(true)).await.unwrap();
        assert_eq!(receipt.provider, "backup");
        assert_eq!(receipt.failed_attempts[0].error_code.as_deref(), Some(TIMEOUT_ERROR_CODE));
        assert_eq!(slow.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_chain() {
        let err = deliver("+919876543210", "123456", &[], &policy(true)).await.unwrap_err();
        assert_eq!(err, DeliveryError::NoProviders);
    }

    #[tokio::test]
    async fn test_status_lookup_selects_provider() {
        let providers: Vec<Arc<dyn SmsProvider>> =
            vec![ScriptedProvider::new("primary", true), ScriptedProvider::new("backup", true)];
        let chain = DeliveryChain::new(providers, policy(true));

        let err = chain.delivery_status("SM123", None).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Delivery(DeliveryError::StatusUnavailable { ref provider, .. }) if provider == "primary"
        ));

        let err = chain.delivery_status("SM123", Some("nexmo")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
