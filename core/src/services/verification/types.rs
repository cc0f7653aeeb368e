//! Result types for the verification service

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::ProviderFailure;

/// Outcome of issuing and delivering a new challenge
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartVerificationResult {
    pub expires_at: DateTime<Utc>,
    /// Provider that delivered the code
    pub provider: String,
    pub message_id: Option<String>,
    /// Target number formatted for display
    pub sent_to: String,
    /// The issued code, only when the service is configured to expose it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Providers that failed before delivery succeeded
    pub failed_attempts: Vec<ProviderFailure>,
}
