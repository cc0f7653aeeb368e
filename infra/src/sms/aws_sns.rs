//! AWS SNS SMS provider
//!
//! Publishes directly to a phone number. Credentials come from the standard
//! AWS provider chain (environment, profile, instance role). SNS has no
//! per-message status lookup, so only sending is supported.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::{
    config::Region,
    error::{DisplayErrorContext, ProvideErrorMetadata},
    types::MessageAttributeValue,
    Client as SnsClient,
};
use std::collections::HashMap;
use tracing::{error, info};

use cv_core::domain::value_objects::DeliveryResult;
use cv_core::services::delivery::{verification_message, SmsProvider};
use cv_shared::utils::phone::mask_phone_number;

use crate::InfrastructureError;

pub const PROVIDER_NAME: &str = "aws-sns";

/// AWS SNS SMS configuration
#[derive(Debug, Clone)]
pub struct AwsSnsConfig {
    pub region: String,
    /// Sender ID, not supported in every region
    pub sender_id: Option<String>,
    /// "Transactional" or "Promotional"
    pub sms_type: String,
}

impl AwsSnsConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let region = std::env::var("AWS_REGION")
            .or_else(|_| std::env::var("AWS_SNS_REGION"))
            .unwrap_or_else(|_| "us-east-1".to_string());

        let sender_id = std::env::var("AWS_SNS_SENDER_ID")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let sms_type = std::env::var("AWS_SNS_SMS_TYPE").unwrap_or_else(|_| "Transactional".to_string());
        if sms_type != "Transactional" && sms_type != "Promotional" {
            return Err(InfrastructureError::Config(
                "AWS_SNS_SMS_TYPE must be either 'Transactional' or 'Promotional'".to_string(),
            ));
        }

        Ok(Self {
            region,
            sender_id,
            sms_type,
        })
    }
}

pub struct AwsSnsSmsProvider {
    client: SnsClient,
    config: AwsSnsConfig,
}

impl AwsSnsSmsProvider {
    pub async fn new(config: AwsSnsConfig) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        info!(
            event = "sms_provider_ready",
            provider = PROVIDER_NAME,
            region = %config.region,
            "AWS SNS SMS provider initialized"
        );

        Self {
            client: SnsClient::new(&aws_config),
            config,
        }
    }

    pub async fn from_env() -> Result<Self, InfrastructureError> {
        Ok(Self::new(AwsSnsConfig::from_env()?).await)
    }

    fn string_attribute(value: &str) -> Result<MessageAttributeValue, String> {
        MessageAttributeValue::builder()
            .data_type("String")
            .string_value(value)
            .build()
            .map_err(|e| e.to_string())
    }

    fn sms_attributes(&self) -> Result<HashMap<String, MessageAttributeValue>, String> {
        let mut attributes = HashMap::new();
        attributes.insert(
            "AWS.SNS.SMS.SMSType".to_string(),
            Self::string_attribute(&self.config.sms_type)?,
        );
        if let Some(sender_id) = &self.config.sender_id {
            attributes.insert("AWS.SNS.SMS.SenderID".to_string(), Self::string_attribute(sender_id)?);
        }
        Ok(attributes)
    }
}

#[async_trait]
impl SmsProvider for AwsSnsSmsProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn send_verification_otp(&self, phone: &str, code: &str) -> DeliveryResult {
        let attributes = match self.sms_attributes() {
            Ok(attributes) => attributes,
            Err(message) => return DeliveryResult::failed(Some("INVALID_ATTRIBUTES".to_string()), message),
        };

        let result = self
            .client
            .publish()
            .phone_number(phone)
            .message(verification_message(code))
            .set_message_attributes(Some(attributes))
            .send()
            .await;

        match result {
            Ok(output) => {
                let message_id = output.message_id().unwrap_or("unknown").to_string();
                info!(
                    event = "sns_accepted",
                    phone = %mask_phone_number(phone),
                    message_id = %message_id,
                    "SMS accepted by AWS SNS"
                );
                DeliveryResult::sent(message_id)
            }
            Err(e) => {
                let error_code = e.code().map(str::to_string);
                let message = e
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| DisplayErrorContext(&e).to_string());
                error!(
                    event = "sns_rejected",
                    phone = %mask_phone_number(phone),
                    error_code = ?error_code,
                    "AWS SNS rejected the message"
                );
                DeliveryResult::failed(error_code, message)
            }
        }
    }
}
