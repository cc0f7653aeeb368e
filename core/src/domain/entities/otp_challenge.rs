//! Server-side record of an issued one-time passcode.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Length of every issued code
pub const CODE_LENGTH: usize = 6;

/// Default mismatches allowed before lockout
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default challenge lifetime
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 10;

/// An OTP awaiting verification, filed under the requesting identity's key
///
/// Only the challenge store mutates a live record; everything else works on
/// copies scoped to a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpChallenge {
    /// The 6-digit code that was sent
    pub code: String,

    /// Canonical phone number the code was sent to
    pub target: String,

    /// Mismatched verification attempts so far
    pub attempts: u32,

    /// Lockout threshold in force when the challenge was minted
    pub max_attempts: u32,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

impl OtpChallenge {
    /// Create a challenge expiring `ttl_minutes` from now with no attempts used
    pub fn create(code: String, target: String, ttl_minutes: i64, max_attempts: u32) -> Self {
        Self::create_at(code, target, ttl_minutes, max_attempts, Utc::now())
    }

    /// Same as [`OtpChallenge::create`] with an explicit clock
    pub fn create_at(
        code: String,
        target: String,
        ttl_minutes: i64,
        max_attempts: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            target,
            attempts: 0,
            max_attempts,
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Terminal once `now` passes `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn remaining_minutes(&self) -> i64 {
        self.remaining_minutes_at(Utc::now())
    }

    /// Whole minutes until expiry, rounded up and clamped at zero
    pub fn remaining_minutes_at(&self, now: DateTime<Utc>) -> i64 {
        let millis = (self.expires_at - now).num_milliseconds();
        if millis <= 0 {
            return 0;
        }
        (millis + 59_999) / 60_000
    }

    pub fn is_locked_out(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }

    /// Copy of this challenge carrying a new attempt count
    pub fn with_attempts(&self, attempts: u32) -> Self {
        Self {
            attempts,
            ..self.clone()
        }
    }
}
