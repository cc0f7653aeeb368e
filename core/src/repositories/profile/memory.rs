//! In-memory profile repository for development and tests

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::UserProfile;
use crate::errors::DomainError;

use super::trait_::ProfileRepository;

#[derive(Clone, Default)]
pub struct InMemoryProfileRepository {
    profiles: Arc<RwLock<HashMap<String, UserProfile>>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile directly
    pub async fn insert(&self, profile: UserProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.identity_key.clone(), profile);
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find(&self, identity_key: &str) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.profiles.read().await.get(identity_key).cloned())
    }

    async fn find_by_contact(&self, contact_number: &str) -> Result<Option<UserProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles
            .values()
            .find(|p| p.contact_number.as_deref() == Some(contact_number))
            .cloned())
    }

    async fn upsert(&self, identity_key: &str, name: Option<String>) -> Result<UserProfile, DomainError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .entry(identity_key.to_string())
            .or_insert_with(|| UserProfile::new(identity_key, None));
        if name.is_some() {
            profile.name = name;
            profile.updated_at = Utc::now();
        }
        Ok(profile.clone())
    }

    async fn update_contact(
        &self,
        identity_key: &str,
        contact_number: &str,
        verified: bool,
    ) -> Result<UserProfile, DomainError> {
        let mut profiles = self.profiles.write().await;
        let taken = profiles
            .values()
            .any(|p| p.identity_key != identity_key && p.contact_number.as_deref() == Some(contact_number));
        if taken {
            return Err(DomainError::Conflict {
                message: "Contact number is already registered to another account".to_string(),
            });
        }
        let profile = profiles
            .get_mut(identity_key)
            .ok_or_else(|| DomainError::not_found("user profile"))?;
        profile.set_contact(contact_number.to_string());
        profile.is_contact_verified = verified;
        Ok(profile.clone())
    }

    async fn mark_contact_verified(&self, identity_key: &str) -> Result<UserProfile, DomainError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(identity_key)
            .ok_or_else(|| DomainError::not_found("user profile"))?;
        profile.mark_contact_verified();
        Ok(profile.clone())
    }

    async fn list_with_contact(&self) -> Result<Vec<UserProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        let mut listed: Vec<UserProfile> = profiles
            .values()
            .filter(|p| p.contact().is_some())
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.identity_key.cmp(&b.identity_key));
        Ok(listed)
    }
}
