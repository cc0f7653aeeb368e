//! Identity verification configuration

use serde::{Deserialize, Serialize};

/// Settings for verifying bearer credentials issued by the identity provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
    /// HMAC secret shared with the identity provider
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    /// Expected `iss` claim, when the provider sets one
    pub issuer: Option<String>,
    /// Expected `aud` claim, when the provider sets one
    pub audience: Option<String>,
    /// Clock skew tolerance in seconds
    pub leeway_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::from("change-me-in-production"),
            issuer: None,
            audience: None,
            leeway_secs: 60,
        }
    }
}

impl IdentityConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            jwt_secret: std::env::var("IDENTITY_JWT_SECRET").unwrap_or(defaults.jwt_secret),
            issuer: non_empty_var("IDENTITY_JWT_ISSUER"),
            audience: non_empty_var("IDENTITY_JWT_AUDIENCE"),
            leeway_secs: super::env_or("IDENTITY_JWT_LEEWAY_SECS", defaults.leeway_secs),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
