//! SMS providers
//!
//! - **Twilio**: REST API over `reqwest`, send and status lookup
//! - **AWS SNS**: publish to a phone number (feature `aws-sns`)
//! - **Mock**: records messages, for development and tests
//!
//! [`build_providers`] turns the configured provider names into the
//! ordered list the delivery chain walks.

use std::sync::Arc;

use cv_core::services::delivery::SmsProvider;
use cv_shared::config::SmsConfig;

use crate::InfrastructureError;

pub mod mock;
pub mod twilio;

#[cfg(feature = "aws-sns")]
pub mod aws_sns;

pub use mock::{MockSmsProvider, SentMessage};
pub use twilio::{TwilioConfig, TwilioSmsProvider};

#[cfg(feature = "aws-sns")]
pub use aws_sns::{AwsSnsConfig, AwsSnsSmsProvider};

/// Instantiate the configured providers in priority order
///
/// A provider whose credentials are missing or invalid is skipped with a
/// warning so the remaining ones still serve. It is an error only when no
/// provider at all could be built.
pub async fn build_providers(config: &SmsConfig) -> Result<Vec<Arc<dyn SmsProvider>>, InfrastructureError> {
    let mut providers: Vec<Arc<dyn SmsProvider>> = Vec::new();

    for name in &config.providers {
        match build_provider(name, config).await {
            Ok(provider) => providers.push(provider),
            Err(e) => tracing::warn!(
                event = "sms_provider_skipped",
                provider = %name,
                error = %e,
                "SMS provider could not be initialized"
            ),
        }
    }

    if providers.is_empty() {
        return Err(InfrastructureError::Config(format!(
            "no SMS provider could be initialized from [{}]",
            config.providers.join(", ")
        )));
    }

    tracing::info!(
        event = "sms_providers_ready",
        providers = ?providers.iter().map(|p| p.name().to_string()).collect::<Vec<_>>(),
        fallback_enabled = config.fallback_enabled,
        "SMS delivery chain configured"
    );
    Ok(providers)
}

async fn build_provider(name: &str, config: &SmsConfig) -> Result<Arc<dyn SmsProvider>, InfrastructureError> {
    match name {
        "twilio" => {
            let mut twilio = TwilioConfig::from_env()?;
            twilio.request_timeout_secs = config.request_timeout_secs;
            Ok(Arc::new(TwilioSmsProvider::new(twilio)?))
        }
        #[cfg(feature = "aws-sns")]
        "aws-sns" | "sns" => Ok(Arc::new(AwsSnsSmsProvider::from_env().await?)),
        "mock" => Ok(Arc::new(MockSmsProvider::new())),
        other => Err(InfrastructureError::Config(format!("unknown SMS provider '{}'", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_mock_provider() {
        let config = SmsConfig {
            providers: vec!["mock".to_string()],
            ..SmsConfig::default()
        };
        let providers = build_providers(&config).await.unwrap();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].name(), "mock");
    }

    #[tokio::test]
    async fn test_unknown_providers_are_an_error() {
        let config = SmsConfig {
            providers: vec!["carrier-pigeon".to_string()],
            ..SmsConfig::default()
        };
        assert!(matches!(
            build_providers(&config).await,
            Err(InfrastructureError::Config(_))
        ));
    }
}
