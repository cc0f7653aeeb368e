//! # ContactVerify Core
//!
//! Domain layer for contact-number verification: phone normalization,
//! OTP challenges and their store, SMS delivery with provider fallback,
//! and the service that orchestrates them. Infrastructure adapters live
//! in `cv_infra`; this crate only defines the seams they plug into.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::{
    ContactNormalizationJob, Country, DeliveryChain, DeliveryPolicy, ExpirySweeper, IdentityVerifier,
    NormalizationReport, PhoneNormalizer, SmsProvider, StartVerificationResult, SweeperConfig,
    VerificationService, VerificationServiceConfig,
};
