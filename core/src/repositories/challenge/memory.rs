//! Process-local challenge store.
//!
//! State lives in this process only. Deployments running more than one API
//! instance must use a shared store instead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::OtpChallenge;
use crate::errors::DomainError;

use super::trait_::{ChallengeStore, Reservation};

/// Challenge store backed by a map behind an async lock
#[derive(Clone, Default)]
pub struct InMemoryChallengeStore {
    challenges: Arc<RwLock<HashMap<String, OtpChallenge>>>,
}

impl InMemoryChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.challenges.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.challenges.read().await.is_empty()
    }
}

#[async_trait]
impl ChallengeStore for InMemoryChallengeStore {
    async fn put(&self, key: &str, challenge: OtpChallenge) -> Result<(), DomainError> {
        self.challenges.write().await.insert(key.to_string(), challenge);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<OtpChallenge>, DomainError> {
        Ok(self.challenges.read().await.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.challenges.write().await.remove(key).is_some())
    }

    async fn insert_if_vacant(
        &self,
        key: &str,
        challenge: OtpChallenge,
        now: DateTime<Utc>,
    ) -> Result<Reservation, DomainError> {
        let mut challenges = self.challenges.write().await;
        if let Some(existing) = challenges.get(key) {
            if !existing.is_expired_at(now) {
                return Ok(Reservation::Occupied(existing.clone()));
            }
        }
        challenges.insert(key.to_string(), challenge);
        Ok(Reservation::Inserted)
    }

    async fn replace_if_current(
        &self,
        key: &str,
        expected: &OtpChallenge,
        updated: OtpChallenge,
    ) -> Result<bool, DomainError> {
        let mut challenges = self.challenges.write().await;
        match challenges.get_mut(key) {
            Some(current) if current == expected => {
                *current = updated;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove_if_current(&self, key: &str, expected: &OtpChallenge) -> Result<bool, DomainError> {
        let mut challenges = self.challenges.write().await;
        if challenges.get(key) == Some(expected) {
            challenges.remove(key);
            return Ok(true);
        }
        Ok(false)
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut challenges = self.challenges.write().await;
        let before = challenges.len();
        challenges.retain(|_, challenge| !challenge.is_expired_at(now));
        Ok(before - challenges.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn challenge(code: &str, now: DateTime<Utc>) -> OtpChallenge {
        OtpChallenge::create_at(code.into(), "+919876543210".into(), 10, 3, now)
    }

    #[tokio::test]
    async fn test_put_get_remove() {
        let store = InMemoryChallengeStore::new();
        let now = Utc::now();
        store.put("asha@example.com", challenge("123456", now)).await.unwrap();

        let fetched = store.get("asha@example.com").await.unwrap().unwrap();
        assert_eq!(fetched.code, "123456");

        assert!(store.remove("asha@example.com").await.unwrap());
        assert!(!store.remove("asha@example.com").await.unwrap());
        assert!(store.get("asha@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_if_vacant_keeps_live_challenge() {
        let store = InMemoryChallengeStore::new();
        let now = Utc::now();
        let first = challenge("111111", now);

        assert_eq!(
            store.insert_if_vacant("k", first.clone(), now).await.unwrap(),
            Reservation::Inserted
        );
        assert_eq!(
            store.insert_if_vacant("k", challenge("222222", now), now).await.unwrap(),
            Reservation::Occupied(first.clone())
        );
        assert_eq!(store.get("k").await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_insert_if_vacant_replaces_expired_challenge() {
        let store = InMemoryChallengeStore::new();
        let issued = Utc::now() - Duration::minutes(20);
        store.put("k", challenge("111111", issued)).await.unwrap();

        let now = Utc::now();
        assert_eq!(
            store.insert_if_vacant("k", challenge("222222", now), now).await.unwrap(),
            Reservation::Inserted
        );
        assert_eq!(store.get("k").await.unwrap().unwrap().code, "222222");
    }

    #[tokio::test]
    async fn test_concurrent_reservations_admit_one() {
        let store = InMemoryChallengeStore::new();
        let now = Utc::now();
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let code = format!("{:06}", 100_000 + i);
                store.insert_if_vacant("k", challenge(&code, now), now).await.unwrap()
            }));
        }

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap() == Reservation::Inserted {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_conditional_writes_detect_stale_reads() {
        let store = InMemoryChallengeStore::new();
        let now = Utc::now();
        let original = challenge("123456", now);
        store.put("k", original.clone()).await.unwrap();

        let bumped = original.with_attempts(1);
        assert!(store.replace_if_current("k", &original, bumped.clone()).await.unwrap());
        // a second writer still holding the original read loses
        assert!(!store.replace_if_current("k", &original, original.with_attempts(1)).await.unwrap());
        assert!(!store.remove_if_current("k", &original).await.unwrap());

        assert!(store.remove_if_current("k", &bumped).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let store = InMemoryChallengeStore::new();
        let now = Utc::now();
        store.put("old", challenge("111111", now - Duration::minutes(15))).await.unwrap();
        store.put("new", challenge("222222", now)).await.unwrap();

        assert_eq!(store.sweep_expired(now).await.unwrap(), 1);
        assert!(store.get("old").await.unwrap().is_none());
        assert!(store.get("new").await.unwrap().is_some());
        assert_eq!(store.sweep_expired(now).await.unwrap(), 0);
    }
}
