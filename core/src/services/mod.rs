//! Business services containing domain logic and use cases.

pub mod contacts;
pub mod delivery;
pub mod identity;
pub mod otp;
pub mod phone;
pub mod verification;

// Re-export commonly used types
pub use contacts::{ContactNormalizationJob, NormalizationReport};
pub use delivery::{DeliveryChain, DeliveryPolicy, SmsProvider};
pub use identity::IdentityVerifier;
pub use otp::{ExpirySweeper, SweeperConfig};
pub use phone::{Country, PhoneNormalizer};
pub use verification::{StartVerificationResult, VerificationService, VerificationServiceConfig};
