//! OTP challenge generation, verification outcomes and expiry sweeping

pub mod generator;
pub mod sweeper;
pub mod validator;

pub use generator::{generate_code, generate_code_with};
pub use sweeper::{ExpirySweeper, SweeperConfig};
pub use validator::{evaluate, VerificationOutcome};
