//! Contact verification workflow
//!
//! This module ties the pieces of the OTP flow together:
//! - Contact number normalization and registration
//! - Challenge issuance with duplicate-request rejection
//! - Delivery through the SMS provider chain
//! - Code verification with attempt tracking and lockout

mod config;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use service::VerificationService;
pub use types::StartVerificationResult;
