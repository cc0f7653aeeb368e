//! Domain-specific error types and error handling.

mod types;

pub use types::{DeliveryError, OtpError, PhoneError, ProviderFailure, ValidationError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Invalid credential: {message}")]
    UpstreamAuth { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Phone(#[from] PhoneError),

    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl DomainError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
