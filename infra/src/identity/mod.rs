//! Upstream identity verification

pub mod jwt_verifier;

pub use jwt_verifier::{Audience, IdentityClaims, JwtIdentityVerifier};
