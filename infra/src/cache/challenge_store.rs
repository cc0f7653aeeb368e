//! Redis implementation of the challenge store
//!
//! Each challenge is a JSON string under `<prefix><identity key>`. Redis
//! expires the key a retention window after the challenge itself expires,
//! so a late verification still sees the record and reports expiry
//! instead of a missing challenge.
//!
//! Conditional writes are Lua scripts comparing the stored JSON with the
//! caller's expected record, which keeps each check-and-write atomic
//! across every API instance sharing the server.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{aio::MultiplexedConnection, AsyncCommands, RedisError, Script};
use tracing::{debug, info, warn};

use cv_core::domain::entities::OtpChallenge;
use cv_core::errors::DomainError;
use cv_core::repositories::{ChallengeStore, Reservation};
use cv_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Seconds an expired record is kept before Redis drops it
const EXPIRED_RETENTION_SECS: u64 = 300;

/// Rounds of SET NX / swap before giving up on a contended key
const RESERVATION_ROUNDS: usize = 5;

const REPLACE_IF_CURRENT: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    redis.call('SET', KEYS[1], ARGV[2], 'KEEPTTL')
    return 1
end
return 0
"#;

const SWAP_WITH_TTL: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    redis.call('SET', KEYS[1], ARGV[2], 'EX', ARGV[3])
    return 1
end
return 0
"#;

const REMOVE_IF_CURRENT: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    return redis.call('DEL', KEYS[1])
end
return 0
"#;

pub struct RedisChallengeStore {
    connection: MultiplexedConnection,
    key_prefix: String,
    replace_script: Script,
    swap_script: Script,
    remove_script: Script,
}

impl RedisChallengeStore {
    pub fn new(connection: MultiplexedConnection, key_prefix: impl Into<String>) -> Self {
        Self {
            connection,
            key_prefix: key_prefix.into(),
            replace_script: Script::new(REPLACE_IF_CURRENT),
            swap_script: Script::new(SWAP_WITH_TTL),
            remove_script: Script::new(REMOVE_IF_CURRENT),
        }
    }

    /// Connect using the cache configuration
    pub async fn connect(config: &CacheConfig) -> Result<Self, InfrastructureError> {
        let connection = super::redis_client::connect(&config.url).await?;
        info!(
            event = "challenge_store_ready",
            backend = "redis",
            prefix = %config.key_prefix,
            "Redis challenge store ready"
        );
        Ok(Self::new(connection, config.key_prefix.clone()))
    }

    fn redis_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn conn(&self) -> MultiplexedConnection {
        self.connection.clone()
    }
}

/// Key lifetime for a challenge written at `now`
fn retention_secs(challenge: &OtpChallenge, now: DateTime<Utc>) -> u64 {
    let live = (challenge.expires_at - now).num_seconds().max(0) as u64;
    live + EXPIRED_RETENTION_SECS
}

fn encode(challenge: &OtpChallenge) -> Result<String, DomainError> {
    serde_json::to_string(challenge).map_err(|e| InfrastructureError::Serialization(e).into())
}

fn decode(raw: &str) -> Result<OtpChallenge, DomainError> {
    serde_json::from_str(raw).map_err(|e| InfrastructureError::Serialization(e).into())
}

fn cache_error(err: RedisError) -> DomainError {
    InfrastructureError::Cache(err).into()
}

#[async_trait]
impl ChallengeStore for RedisChallengeStore {
    async fn put(&self, key: &str, challenge: OtpChallenge) -> Result<(), DomainError> {
        let ttl = retention_secs(&challenge, Utc::now());
        let value = encode(&challenge)?;
        redis::cmd("SET")
            .arg(self.redis_key(key))
            .arg(value)
            .arg("EX")
            .arg(ttl)
            .query_async::<_, ()>(&mut self.conn())
            .await
            .map_err(cache_error)
    }

    async fn get(&self, key: &str) -> Result<Option<OtpChallenge>, DomainError> {
        let raw: Option<String> = self.conn().get(self.redis_key(key)).await.map_err(cache_error)?;
        raw.as_deref().map(decode).transpose()
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        let removed: i64 = self.conn().del(self.redis_key(key)).await.map_err(cache_error)?;
        Ok(removed > 0)
    }

    async fn insert_if_vacant(
        &self,
        key: &str,
        challenge: OtpChallenge,
        now: DateTime<Utc>,
    ) -> Result<Reservation, DomainError> {
        let redis_key = self.redis_key(key);
        let value = encode(&challenge)?;
        let ttl = retention_secs(&challenge, now);
        let mut conn = self.conn();

        for _ in 0..RESERVATION_ROUNDS {
            let inserted: Option<String> = redis::cmd("SET")
                .arg(&redis_key)
                .arg(&value)
                .arg("NX")
                .arg("EX")
                .arg(ttl)
                .query_async(&mut conn)
                .await
                .map_err(cache_error)?;
            if inserted.is_some() {
                return Ok(Reservation::Inserted);
            }

            let current: Option<String> = conn.get(&redis_key).await.map_err(cache_error)?;
            let Some(raw) = current else {
                // Removed between the two commands
                continue;
            };

            let existing = decode(&raw)?;
            if !existing.is_expired_at(now) {
                return Ok(Reservation::Occupied(existing));
            }

            let swapped: i64 = self
                .swap_script
                .key(&redis_key)
                .arg(&raw)
                .arg(&value)
                .arg(ttl)
                .invoke_async(&mut conn)
                .await
                .map_err(cache_error)?;
            if swapped == 1 {
                debug!(event = "challenge_replaced_expired", "Replaced expired challenge");
                return Ok(Reservation::Inserted);
            }
        }

        warn!(event = "challenge_reservation_contended", "Challenge key kept changing");
        Err(DomainError::internal("challenge key is contended"))
    }

    async fn replace_if_current(
        &self,
        key: &str,
        expected: &OtpChallenge,
        updated: OtpChallenge,
    ) -> Result<bool, DomainError> {
        let replaced: i64 = self
            .replace_script
            .key(self.redis_key(key))
            .arg(encode(expected)?)
            .arg(encode(&updated)?)
            .invoke_async(&mut self.conn())
            .await
            .map_err(cache_error)?;
        Ok(replaced == 1)
    }

    async fn remove_if_current(&self, key: &str, expected: &OtpChallenge) -> Result<bool, DomainError> {
        let removed: i64 = self
            .remove_script
            .key(self.redis_key(key))
            .arg(encode(expected)?)
            .invoke_async(&mut self.conn())
            .await
            .map_err(cache_error)?;
        Ok(removed > 0)
    }

    /// Redis drops expired records through key TTLs, so nothing is left to sweep
    async fn sweep_expired(&self, _now: DateTime<Utc>) -> Result<usize, DomainError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_retention_outlives_expiry() {
        let now = Utc::now();
        let challenge = OtpChallenge::create_at("123456".into(), "+919876543210".into(), 10, 3, now);
        assert_eq!(retention_secs(&challenge, now), 600 + EXPIRED_RETENTION_SECS);

        let later = now + Duration::minutes(15);
        assert_eq!(retention_secs(&challenge, later), EXPIRED_RETENTION_SECS);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("not json"), Err(DomainError::Internal { .. })));
    }
}
