//! Concurrent requests against the same identity key

use std::sync::Arc;

use crate::errors::{DomainError, OtpError};
use crate::repositories::ChallengeStore;

use super::mocks::{harness, seed_profile, MockSmsProvider, TestService, USER, USER_PHONE};

async fn run_concurrently<F, Fut, T>(n: usize, service: Arc<TestService>, f: F) -> Vec<T>
where
    F: Fn(Arc<TestService>) -> Fut,
    Fut: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = (0..n).map(|_| tokio::spawn(f(service.clone()))).collect();
    let mut results = Vec::with_capacity(n);
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_starts_issue_one_challenge() {
    let sms = MockSmsProvider::new("twilio", false);
    let h = harness(vec![sms.clone()]);
    seed_profile(&h.profiles, USER, Some(USER_PHONE)).await;
    let service = Arc::new(h.service);

    let results = run_concurrently(12, service, |s| async move { s.start_verification(USER).await }).await;

    let issued = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(DomainError::Otp(OtpError::ChallengeInFlight { .. }))))
        .count();
    assert_eq!(issued, 1);
    assert_eq!(rejected, 11);
    assert_eq!(sms.calls(), 1);

    let stored = h.store.get(USER).await.unwrap().unwrap();
    assert_eq!(sms.get_sent_code(USER_PHONE), Some(stored.code));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_wrong_codes_never_lose_attempts() {
    let sms = MockSmsProvider::new("twilio", false);
    let h = harness(vec![sms.clone()]);
    seed_profile(&h.profiles, USER, Some(USER_PHONE)).await;
    h.service.start_verification(USER).await.unwrap();
    let service = Arc::new(h.service);

    let results = run_concurrently(10, service, |s| async move { s.verify(USER, "000000").await }).await;

    let count = |wanted: fn(&DomainError) -> bool| {
        results
            .iter()
            .filter(|r| matches!(r, Err(e) if wanted(e)))
            .count()
    };
    let invalid = count(|e| matches!(e, DomainError::Otp(OtpError::InvalidCode { .. })));
    let locked = count(|e| matches!(e, DomainError::Otp(OtpError::LockedOut)));
    let missing = count(|e| matches!(e, DomainError::Otp(OtpError::NoActiveChallenge)));

    // Two counted mismatches, one lockout, and the rest arrive after removal
    assert_eq!(invalid, 2);
    assert_eq!(locked, 1);
    assert_eq!(missing, 7);
    assert!(h.store.get(USER).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_correct_codes_verify_once() {
    let sms = MockSmsProvider::new("twilio", false);
    let h = harness(vec![sms.clone()]);
    seed_profile(&h.profiles, USER, Some(USER_PHONE)).await;
    h.service.start_verification(USER).await.unwrap();
    let code = sms.get_sent_code(USER_PHONE).unwrap();
    let service = Arc::new(h.service);

    let results = run_concurrently(6, service, move |s| {
        let code = code.clone();
        async move { s.verify(USER, &code).await }
    })
    .await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::Otp(OtpError::NoActiveChallenge))))
            .count(),
        5
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_contact_updates_register_one_owner() {
    let h = harness(vec![MockSmsProvider::new("twilio", false)]);
    let keys: Vec<String> = (0..8).map(|i| format!("user{}@example.com", i)).collect();
    for key in &keys {
        seed_profile(&h.profiles, key, None).await;
    }
    let service = Arc::new(h.service);

    let handles: Vec<_> = keys
        .iter()
        .cloned()
        .map(|key| {
            let service = service.clone();
            tokio::spawn(async move { service.update_contact(&key, "98765 43210").await })
        })
        .collect();
    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    let owners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(DomainError::Conflict { .. })))
        .count();
    assert_eq!(owners, 1);
    assert_eq!(conflicts, 7);
}
