//! Twilio SMS provider
//!
//! Talks to the Twilio Messages REST API directly over `reqwest`:
//! - `POST /2010-04-01/Accounts/{sid}/Messages.json` to send
//! - `GET  /2010-04-01/Accounts/{sid}/Messages/{message sid}.json` for status
//!
//! Each send is a single attempt; retrying is the delivery chain's job.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info, warn};

use cv_core::domain::value_objects::{DeliveryResult, DeliveryStatus};
use cv_core::errors::{DeliveryError, DomainError};
use cv_core::services::delivery::{verification_message, SmsProvider};
use cv_shared::utils::phone::mask_phone_number;

use crate::InfrastructureError;

pub const PROVIDER_NAME: &str = "twilio";

const DEFAULT_API_BASE: &str = "https://api.twilio.com";

/// Error code reported when Twilio could not be reached at all
const NETWORK_ERROR_CODE: &str = "NETWORK";

/// Twilio SMS service configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Account SID (`AC...`) or API key SID (`SK...`)
    pub account_sid: String,
    pub auth_token: String,
    /// Sending number in E.164 form
    pub from_number: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

impl TwilioConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InfrastructureError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| InfrastructureError::Config(format!("{} not set", key)))
        };

        let account_sid = required("TWILIO_ACCOUNT_SID")?;
        if !(account_sid.starts_with("AC") || account_sid.starts_with("SK")) {
            return Err(InfrastructureError::Config(
                "TWILIO_ACCOUNT_SID must start with 'AC' or 'SK'".to_string(),
            ));
        }

        let auth_token = required("TWILIO_AUTH_TOKEN")?;

        let from_number: String = required("TWILIO_FROM_NUMBER")?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if !from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_FROM_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        Ok(Self {
            account_sid,
            auth_token,
            from_number,
            api_base: lookup("TWILIO_API_BASE")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            request_timeout_secs: lookup("TWILIO_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/2010-04-01/Accounts/{}/Messages.json", self.api_base, self.account_sid)
    }

    fn message_url(&self, message_sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages/{}.json",
            self.api_base, self.account_sid, message_sid
        )
    }
}

/// Message resource as returned by Twilio
#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
    status: String,
    date_created: Option<String>,
    date_sent: Option<String>,
    date_updated: Option<String>,
    error_code: Option<i64>,
    error_message: Option<String>,
}

/// Error body Twilio returns with non-2xx responses
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

/// Twilio SMS provider
pub struct TwilioSmsProvider {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioSmsProvider {
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            event = "sms_provider_ready",
            provider = PROVIDER_NAME,
            from = %mask_phone_number(&config.from_number),
            "Twilio SMS provider initialized"
        );

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, InfrastructureError> {
        Self::new(TwilioConfig::from_env()?)
    }

    fn status_unavailable(message: impl Into<String>) -> DomainError {
        DeliveryError::StatusUnavailable {
            provider: PROVIDER_NAME.to_string(),
            message: message.into(),
        }
        .into()
    }
}

/// Map a non-2xx Twilio response to a failed delivery
fn failure_from_response(status: reqwest::StatusCode, body: &str) -> DeliveryResult {
    match serde_json::from_str::<TwilioErrorBody>(body) {
        Ok(parsed) => DeliveryResult::failed(
            parsed.code.map(|c| c.to_string()).or_else(|| Some(status.as_u16().to_string())),
            parsed
                .message
                .unwrap_or_else(|| format!("Twilio returned HTTP {}", status.as_u16())),
        ),
        Err(_) => DeliveryResult::failed(
            Some(status.as_u16().to_string()),
            format!("Twilio returned HTTP {}", status.as_u16()),
        ),
    }
}

/// Twilio timestamps are RFC 2822 strings
fn parse_twilio_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| DateTime::parse_from_rfc2822(v).ok())
        .map(|d| d.with_timezone(&Utc))
}

fn status_from_message(message: TwilioMessage) -> DeliveryStatus {
    DeliveryStatus {
        date_created: parse_twilio_date(message.date_created.as_deref()),
        date_sent: parse_twilio_date(message.date_sent.as_deref()),
        date_updated: parse_twilio_date(message.date_updated.as_deref()),
        message_id: message.sid,
        provider: PROVIDER_NAME.to_string(),
        status: message.status,
        error_code: message.error_code.map(|c| c.to_string()),
        error_message: message.error_message,
    }
}

#[async_trait]
impl SmsProvider for TwilioSmsProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn send_verification_otp(&self, phone: &str, code: &str) -> DeliveryResult {
        let body = verification_message(code);
        let form = [
            ("To", phone),
            ("From", self.config.from_number.as_str()),
            ("Body", body.as_str()),
        ];

        let response = match self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(
                    event = "twilio_request_failed",
                    phone = %mask_phone_number(phone),
                    error = %e,
                    "Twilio request failed"
                );
                return DeliveryResult::failed(Some(NETWORK_ERROR_CODE.to_string()), e.to_string());
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return DeliveryResult::failed(Some(NETWORK_ERROR_CODE.to_string()), e.to_string()),
        };

        if !status.is_success() {
            let result = failure_from_response(status, &text);
            warn!(
                event = "twilio_rejected",
                phone = %mask_phone_number(phone),
                http_status = status.as_u16(),
                error_code = ?result.error_code,
                "Twilio rejected the message"
            );
            return result;
        }

        match serde_json::from_str::<TwilioMessage>(&text) {
            Ok(message) => {
                info!(
                    event = "twilio_accepted",
                    phone = %mask_phone_number(phone),
                    message_id = %message.sid,
                    status = %message.status,
                    "SMS accepted by Twilio"
                );
                DeliveryResult::sent(message.sid)
            }
            Err(e) => DeliveryResult::failed(None, format!("Unreadable Twilio response: {}", e)),
        }
    }

    async fn delivery_status(&self, message_id: &str) -> Result<DeliveryStatus, DomainError> {
        let response = self
            .client
            .get(self.config.message_url(message_id))
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await
            .map_err(|e| Self::status_unavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DomainError::not_found(format!("message '{}'", message_id)));
        }
        if !status.is_success() {
            return Err(Self::status_unavailable(format!("Twilio returned HTTP {}", status.as_u16())));
        }

        let message: TwilioMessage = response
            .json()
            .await
            .map_err(|e| Self::status_unavailable(e.to_string()))?;
        Ok(status_from_message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const VALID: &[(&str, &str)] = &[
        ("TWILIO_ACCOUNT_SID", "ACtest_account_sid"),
        ("TWILIO_AUTH_TOKEN", "test_auth_token"),
        ("TWILIO_FROM_NUMBER", "+1 555 123 4567"),
    ];

    #[test]
    fn test_config_from_lookup() {
        let config = TwilioConfig::from_lookup(lookup(VALID)).unwrap();
        assert_eq!(config.account_sid, "ACtest_account_sid");
        assert_eq!(config.from_number, "+15551234567");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(
            config.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/ACtest_account_sid/Messages.json"
        );
    }

    #[test]
    fn test_config_accepts_api_key_sid_and_custom_base() {
        let mut vars = VALID.to_vec();
        vars[0] = ("TWILIO_ACCOUNT_SID", "SKkey");
        vars.push(("TWILIO_API_BASE", "http://localhost:8080/"));
        let config = TwilioConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.message_url("SM1"), "http://localhost:8080/2010-04-01/Accounts/SKkey/Messages/SM1.json");
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let mut bad_sid = VALID.to_vec();
        bad_sid[0] = ("TWILIO_ACCOUNT_SID", "XX123");
        assert!(matches!(
            TwilioConfig::from_lookup(lookup(&bad_sid)),
            Err(InfrastructureError::Config(_))
        ));

        let mut bad_from = VALID.to_vec();
        bad_from[2] = ("TWILIO_FROM_NUMBER", "15551234567");
        assert!(TwilioConfig::from_lookup(lookup(&bad_from)).is_err());

        assert!(TwilioConfig::from_lookup(lookup(&VALID[..2])).is_err());
    }

    #[test]
    fn test_failure_from_error_body() {
        let body = r#"{"code": 21211, "message": "The 'To' number is not a valid phone number.", "status": 400}"#;
        let result = failure_from_response(reqwest::StatusCode::BAD_REQUEST, body);
        assert!(!result.success);
        assert_eq!(result.error_code.as_deref(), Some("21211"));
        assert!(result.human_message.unwrap().contains("not a valid phone number"));

        let opaque = failure_from_response(reqwest::StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(opaque.error_code.as_deref(), Some("502"));
    }

    #[test]
    fn test_status_from_message() {
        let body = r#"{
            "sid": "SM123",
            "status": "delivered",
            "date_created": "Fri, 17 Oct 2025 10:00:00 +0000",
            "date_sent": "Fri, 17 Oct 2025 10:00:02 +0000",
            "date_updated": null,
            "error_code": null,
            "error_message": null
        }"#;
        let message: TwilioMessage = serde_json::from_str(body).unwrap();
        let status = status_from_message(message);
        assert_eq!(status.message_id, "SM123");
        assert_eq!(status.provider, "twilio");
        assert_eq!(status.status, "delivered");
        assert_eq!(status.date_sent.unwrap().to_rfc3339(), "2025-10-17T10:00:02+00:00");
        assert!(status.date_updated.is_none());
        assert!(status.error_code.is_none());
    }
}
