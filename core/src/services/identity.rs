//! Upstream identity verification capability

use async_trait::async_trait;

use crate::domain::value_objects::VerifiedIdentity;
use crate::errors::DomainError;

/// Verifies a bearer credential issued by the upstream identity provider
///
/// Implementations return [`DomainError::UpstreamAuth`] for any credential
/// they cannot accept.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, DomainError>;
}
