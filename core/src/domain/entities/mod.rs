//! Domain entities

pub mod otp_challenge;
pub mod user_profile;

pub use otp_challenge::{OtpChallenge, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, DEFAULT_MAX_ATTEMPTS};
pub use user_profile::UserProfile;
