//! Mapping of domain errors to HTTP responses
//!
//! Status codes and machine-readable codes are chosen from the error
//! variant. Internal failures are logged and reported with a fixed message.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use cv_core::errors::{DeliveryError, DomainError, OtpError, PhoneError, ValidationError};
use cv_shared::errors::{error_codes, ErrorResponse};

const INTERNAL_MESSAGE: &str = "An internal error occurred. Please try again later.";

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    /// Request body or query failed structural validation
    pub fn invalid_field(field: impl Into<String>) -> Self {
        ApiError(DomainError::Validation(ValidationError::InvalidFormat { field: field.into() }))
    }

    pub fn domain(&self) -> &DomainError {
        &self.0
    }

    fn body(&self) -> ErrorResponse {
        let message = self.0.to_string();
        match &self.0 {
            DomainError::Validation(_) => ErrorResponse::new(error_codes::VALIDATION_ERROR, message),
            DomainError::Phone(PhoneError::UnsupportedCountry { .. }) => {
                ErrorResponse::new(error_codes::UNSUPPORTED_COUNTRY, message)
            }
            DomainError::Phone(_) => ErrorResponse::new(error_codes::PHONE_INVALID, message),
            DomainError::NotFound { .. } => ErrorResponse::new(error_codes::NOT_FOUND, message),
            DomainError::Conflict { .. } => ErrorResponse::new(error_codes::CONTACT_ALREADY_REGISTERED, message),
            DomainError::UpstreamAuth { .. } => {
                ErrorResponse::new(error_codes::UNAUTHORIZED, "Invalid or missing identity token")
            }
            DomainError::Internal { .. } => ErrorResponse::new(error_codes::INTERNAL_ERROR, INTERNAL_MESSAGE),
            DomainError::Otp(otp) => match otp {
                OtpError::ChallengeInFlight {
                    remaining_minutes,
                    expires_at,
                } => ErrorResponse::new(error_codes::OTP_ALREADY_SENT, message)
                    .add_detail("remainingMinutes", remaining_minutes)
                    .add_detail("expiresAt", expires_at),
                OtpError::InvalidCode { attempts_remaining } => {
                    ErrorResponse::new(error_codes::OTP_INVALID, message)
                        .add_detail("attemptsRemaining", attempts_remaining)
                }
                OtpError::NoActiveChallenge => ErrorResponse::new(error_codes::OTP_NOT_FOUND, message),
                OtpError::Expired => ErrorResponse::new(error_codes::OTP_EXPIRED, message),
                OtpError::LockedOut => ErrorResponse::new(error_codes::OTP_LOCKED_OUT, message),
                OtpError::AlreadyVerified => ErrorResponse::new(error_codes::CONTACT_ALREADY_VERIFIED, message),
            },
            DomainError::Delivery(delivery) => match delivery {
                DeliveryError::AllProvidersFailed { failures } => {
                    ErrorResponse::new(error_codes::SMS_DELIVERY_FAILED, message).with_details(failures)
                }
                DeliveryError::NoProviders => ErrorResponse::new(error_codes::SMS_DELIVERY_FAILED, message),
                DeliveryError::StatusUnavailable { .. } => {
                    ErrorResponse::new(error_codes::SMS_STATUS_UNAVAILABLE, message)
                }
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) | DomainError::Phone(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict { .. } => StatusCode::CONFLICT,
            DomainError::UpstreamAuth { .. } => StatusCode::UNAUTHORIZED,
            DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            DomainError::Otp(otp) => match otp {
                OtpError::ChallengeInFlight { .. } => StatusCode::CONFLICT,
                OtpError::InvalidCode { .. } | OtpError::AlreadyVerified => StatusCode::BAD_REQUEST,
                OtpError::NoActiveChallenge => StatusCode::NOT_FOUND,
                OtpError::Expired => StatusCode::GONE,
                OtpError::LockedOut => StatusCode::TOO_MANY_REQUESTS,
            },
            DomainError::Delivery(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(event = "request_failed", status = status.as_u16(), error = %self.0, "Request failed");
        } else {
            tracing::debug!(event = "request_rejected", status = status.as_u16(), error = %self.0, "Request rejected");
        }
        HttpResponse::build(status).json(self.body())
    }
}
