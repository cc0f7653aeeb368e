//! Verification outcome decision.
//!
//! `evaluate` never touches the store. It reports what should happen to the
//! record and the caller performs that single write.

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use serde::Serialize;

use crate::domain::entities::OtpChallenge;

/// Result of checking a submitted code against a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum VerificationOutcome {
    /// Code matched a live challenge; the record must be removed
    Accepted,
    /// Challenge is past its expiry; the record must be removed
    Expired,
    /// Attempts reached the limit; the record must be removed
    LockedOut { attempts: u32 },
    /// Code mismatch; the record is kept with the new attempt count
    Rejected { attempts: u32, attempts_remaining: u32 },
}

impl VerificationOutcome {
    /// Whether the caller must delete the challenge
    pub fn purges_record(&self) -> bool {
        !matches!(self, VerificationOutcome::Rejected { .. })
    }
}

/// Decide the outcome of submitting `code` for `challenge` at `now`
///
/// Expiry wins over everything else, so an expired challenge reports
/// `Expired` whether or not the code is correct.
pub fn evaluate(challenge: &OtpChallenge, code: &str, now: DateTime<Utc>) -> VerificationOutcome {
    if challenge.is_expired_at(now) {
        return VerificationOutcome::Expired;
    }

    if challenge.is_locked_out() {
        return VerificationOutcome::LockedOut {
            attempts: challenge.attempts,
        };
    }

    if constant_time_eq(challenge.code.as_bytes(), code.as_bytes()) {
        return VerificationOutcome::Accepted;
    }

    let attempts = challenge.attempts + 1;
    if attempts >= challenge.max_attempts {
        VerificationOutcome::LockedOut { attempts }
    } else {
        VerificationOutcome::Rejected {
            attempts,
            attempts_remaining: challenge.max_attempts - attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn challenge(now: DateTime<Utc>) -> OtpChallenge {
        OtpChallenge::create_at("123456".into(), "+919876543210".into(), 10, 3, now)
    }

    #[test]
    fn test_matching_code_is_accepted() {
        let now = Utc::now();
        assert_eq!(evaluate(&challenge(now), "123456", now), VerificationOutcome::Accepted);
    }

    #[test]
    fn test_mismatches_count_down_to_lockout() {
        let now = Utc::now();
        let mut current = challenge(now);

        let first = evaluate(&current, "000000", now);
        assert_eq!(first, VerificationOutcome::Rejected { attempts: 1, attempts_remaining: 2 });
        current = current.with_attempts(1);

        let second = evaluate(&current, "000000", now);
        assert_eq!(second, VerificationOutcome::Rejected { attempts: 2, attempts_remaining: 1 });
        current = current.with_attempts(2);

        let third = evaluate(&current, "000000", now);
        assert_eq!(third, VerificationOutcome::LockedOut { attempts: 3 });
        assert!(third.purges_record());
    }

    #[test]
    fn test_correct_code_after_failures_is_accepted() {
        let now = Utc::now();
        let current = challenge(now).with_attempts(2);
        assert_eq!(evaluate(&current, "123456", now), VerificationOutcome::Accepted);
    }

    #[test]
    fn test_expired_regardless_of_code() {
        let issued = Utc::now();
        let later = issued + Duration::minutes(11);
        let current = challenge(issued);
        assert_eq!(evaluate(&current, "123456", later), VerificationOutcome::Expired);
        assert_eq!(evaluate(&current, "000000", later), VerificationOutcome::Expired);
    }

    #[test]
    fn test_exhausted_record_stays_locked() {
        let now = Utc::now();
        let current = challenge(now).with_attempts(3);
        assert_eq!(
            evaluate(&current, "123456", now),
            VerificationOutcome::LockedOut { attempts: 3 }
        );
    }

    #[test]
    fn test_single_attempt_policy_locks_on_first_miss() {
        let now = Utc::now();
        let strict = OtpChallenge::create_at("123456".into(), "+919876543210".into(), 10, 1, now);
        assert_eq!(evaluate(&strict, "654321", now), VerificationOutcome::LockedOut { attempts: 1 });
    }
}
