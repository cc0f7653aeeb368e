//! Route handlers
//!
//! - `health`: liveness endpoints
//! - `auth`: contact registration and OTP verification

pub mod auth;
pub mod health;
