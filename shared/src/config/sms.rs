//! SMS delivery configuration

use serde::{Deserialize, Serialize};

/// Provider order and fallback policy for the delivery chain
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Provider names in priority order ("twilio", "aws-sns", "mock")
    pub providers: Vec<String>,
    /// Whether providers after the first are tried when the primary fails
    pub fallback_enabled: bool,
    /// Per-provider request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            providers: vec![String::from("twilio"), String::from("aws-sns")],
            fallback_enabled: false,
            request_timeout_secs: 30,
        }
    }
}

impl SmsConfig {
    /// Create from environment variables
    ///
    /// `SMS_PROVIDERS` takes an ordered comma separated list. A lone
    /// `SMS_PROVIDER` replaces only the primary and keeps the default
    /// fallbacks behind it.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let providers = match std::env::var("SMS_PROVIDERS") {
            Ok(list) => parse_provider_list(&list),
            Err(_) => match std::env::var("SMS_PROVIDER") {
                Ok(primary) => with_primary(primary.trim(), &defaults.providers),
                Err(_) => defaults.providers.clone(),
            },
        };

        Self {
            providers: if providers.is_empty() { defaults.providers } else { providers },
            fallback_enabled: super::env_flag("SMS_FALLBACK_ENABLED"),
            request_timeout_secs: super::env_or("SMS_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
        }
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_provider_list(list: &str) -> Vec<String> {
    let mut providers: Vec<String> = Vec::new();
    for name in list.split(',').map(|p| p.trim().to_ascii_lowercase()) {
        if !name.is_empty() && !providers.contains(&name) {
            providers.push(name);
        }
    }
    providers
}

fn with_primary(primary: &str, defaults: &[String]) -> Vec<String> {
    let primary = primary.to_ascii_lowercase();
    let mut providers = vec![primary.clone()];
    providers.extend(defaults.iter().filter(|p| **p != primary).cloned());
    providers
}
