//! User profile persistence used by the verification flow.
//!
//! Only the fields the flow touches are modelled: the contact number and
//! its verified flag, plus the display name recorded at login.

use async_trait::async_trait;

use crate::domain::entities::UserProfile;
use crate::errors::DomainError;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find the profile filed under `identity_key`
    async fn find(&self, identity_key: &str) -> Result<Option<UserProfile>, DomainError>;

    /// Find the profile currently holding `contact_number` (canonical form)
    async fn find_by_contact(&self, contact_number: &str) -> Result<Option<UserProfile>, DomainError>;

    /// Create the profile or refresh its name, returning the stored record
    async fn upsert(&self, identity_key: &str, name: Option<String>) -> Result<UserProfile, DomainError>;

    /// Store a contact number and its verified flag
    async fn update_contact(
        &self,
        identity_key: &str,
        contact_number: &str,
        verified: bool,
    ) -> Result<UserProfile, DomainError>;

    /// Flag the stored contact number as verified
    async fn mark_contact_verified(&self, identity_key: &str) -> Result<UserProfile, DomainError>;

    /// Every profile with a non-empty contact number
    async fn list_with_contact(&self) -> Result<Vec<UserProfile>, DomainError>;
}
