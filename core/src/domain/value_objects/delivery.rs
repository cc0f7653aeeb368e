//! Delivery outcomes shared by every SMS provider

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ProviderFailure;

/// Result of a single provider send; identical shape for every provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_message: Option<String>,
}

impl DeliveryResult {
    pub fn sent(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            provider_message_id: Some(message_id.into()),
            error_code: None,
            human_message: None,
        }
    }

    pub fn failed(error_code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            provider_message_id: None,
            error_code,
            human_message: Some(message.into()),
        }
    }

    /// Diagnostics entry for an aggregate failure
    pub fn to_failure(&self, provider: &str) -> ProviderFailure {
        ProviderFailure {
            provider: provider.to_string(),
            error_code: self.error_code.clone(),
            message: self
                .human_message
                .clone()
                .unwrap_or_else(|| "delivery failed".to_string()),
        }
    }
}

/// Successful delivery tagged with the provider that carried it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryReceipt {
    pub provider: String,
    pub result: DeliveryResult,
    /// Providers that failed before this one succeeded
    pub failed_attempts: Vec<ProviderFailure>,
}

impl DeliveryReceipt {
    pub fn message_id(&self) -> Option<&str> {
        self.result.provider_message_id.as_deref()
    }
}

/// Provider status envelope for a previously sent message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatus {
    pub message_id: String,
    pub provider: String,
    pub status: String,
    pub date_created: Option<DateTime<Utc>>,
    pub date_sent: Option<DateTime<Utc>>,
    pub date_updated: Option<DateTime<Utc>>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}
