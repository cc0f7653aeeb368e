//! Keyed store of in-flight OTP challenges.
//!
//! The store is the only owner of mutable challenge state. Every method is
//! atomic for a single key, and the conditional methods let callers apply
//! the outcome of a check they made on a previously read record without
//! losing a concurrent update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::OtpChallenge;
use crate::errors::DomainError;

/// Outcome of [`ChallengeStore::insert_if_vacant`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reservation {
    /// The challenge was stored
    Inserted,
    /// A live challenge already holds the key; nothing was written
    Occupied(OtpChallenge),
}

#[async_trait]
pub trait ChallengeStore: Send + Sync {
    /// Store `challenge` under `key`, overwriting any existing entry
    async fn put(&self, key: &str, challenge: OtpChallenge) -> Result<(), DomainError>;

    /// Fetch the entry for `key`, including an expired one not yet swept
    async fn get(&self, key: &str) -> Result<Option<OtpChallenge>, DomainError>;

    /// Remove the entry for `key`; `true` if something was removed
    async fn remove(&self, key: &str) -> Result<bool, DomainError>;

    /// Store `challenge` only if `key` is empty or holds an expired entry
    ///
    /// The check and the write happen as one step, so two concurrent
    /// callers can never both get [`Reservation::Inserted`] for live
    /// challenges on the same key.
    async fn insert_if_vacant(
        &self,
        key: &str,
        challenge: OtpChallenge,
        now: DateTime<Utc>,
    ) -> Result<Reservation, DomainError>;

    /// Replace the entry with `updated` only if it still equals `expected`
    async fn replace_if_current(
        &self,
        key: &str,
        expected: &OtpChallenge,
        updated: OtpChallenge,
    ) -> Result<bool, DomainError>;

    /// Remove the entry only if it still equals `expected`
    async fn remove_if_current(&self, key: &str, expected: &OtpChallenge) -> Result<bool, DomainError>;

    /// Drop every entry whose `expires_at` is before `now`, returning how many went
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
