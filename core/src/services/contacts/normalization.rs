//! Bulk normalization of stored contact numbers
//!
//! Rewrites every stored contact into canonical form so lookups by
//! contact number match regardless of how the number was first entered.
//! Preview mode reports the changes without writing them.

use std::sync::Arc;
use tracing::{error, info, warn};

use cv_shared::utils::phone::mask_phone_number;

use crate::errors::DomainError;
use crate::repositories::ProfileRepository;
use crate::services::phone::PhoneNormalizer;

/// A contact number rewritten (or to be rewritten) by the job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactChange {
    pub identity_key: String,
    pub before: String,
    pub after: String,
}

/// Summary of one normalization run
#[derive(Debug, Default, Clone)]
pub struct NormalizationReport {
    pub processed: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub invalid: usize,
    pub changes: Vec<ContactChange>,
    pub errors: Vec<String>,
}

impl NormalizationReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub struct ContactNormalizationJob<P: ProfileRepository + ?Sized + 'static> {
    profiles: Arc<P>,
    normalizer: PhoneNormalizer,
}

impl<P: ProfileRepository + ?Sized + 'static> ContactNormalizationJob<P> {
    pub fn new(profiles: Arc<P>, normalizer: PhoneNormalizer) -> Self {
        Self { profiles, normalizer }
    }

    /// Normalize every stored contact number
    ///
    /// Numbers that still fail structural validation after normalization
    /// are counted as invalid and left as they are. The verified flag is
    /// preserved since only the representation changes.
    pub async fn run(&self, preview: bool) -> Result<NormalizationReport, DomainError> {
        let profiles = self.profiles.list_with_contact().await?;
        info!(
            event = "contact_normalization_started",
            profiles = profiles.len(),
            preview,
            "Starting contact normalization"
        );

        let mut report = NormalizationReport::default();

        for profile in profiles {
            let Some(before) = profile.contact() else {
                continue;
            };
            report.processed += 1;

            let after = self.normalizer.normalize(before);
            if !self.normalizer.validate_structural(&after) {
                warn!(
                    event = "contact_normalization_invalid",
                    identity = %profile.identity_key,
                    phone = %mask_phone_number(before),
                    "Stored contact number is not a valid phone number"
                );
                report.invalid += 1;
                continue;
            }

            if after == before {
                report.unchanged += 1;
                continue;
            }

            let change = ContactChange {
                identity_key: profile.identity_key.clone(),
                before: before.to_string(),
                after,
            };

            if !preview {
                if let Err(e) = self
                    .profiles
                    .update_contact(&change.identity_key, &change.after, profile.is_contact_verified)
                    .await
                {
                    error!(
                        event = "contact_normalization_failed",
                        identity = %change.identity_key,
                        error = %e,
                        "Failed to store normalized contact"
                    );
                    report.errors.push(format!("{}: {}", change.identity_key, e));
                    continue;
                }
            }

            report.updated += 1;
            report.changes.push(change);
        }

        info!(
            event = "contact_normalization_completed",
            processed = report.processed,
            updated = report.updated,
            invalid = report.invalid,
            preview,
            "Contact normalization finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserProfile;
    use crate::repositories::InMemoryProfileRepository;
    use crate::services::phone::Country;

    fn profile(key: &str, contact: &str, verified: bool) -> UserProfile {
        let mut p = UserProfile::new(key, None);
        p.contact_number = Some(contact.to_string());
        p.is_contact_verified = verified;
        p
    }

    async fn seeded() -> Arc<InMemoryProfileRepository> {
        let repo = Arc::new(InMemoryProfileRepository::new());
        repo.insert(profile("a@example.com", "98765 43210", true)).await;
        repo.insert(profile("b@example.com", "+919876543211", false)).await;
        repo.insert(profile("c@example.com", "12", false)).await;
        repo.insert(UserProfile::new("d@example.com", None)).await;
        repo
    }

    #[tokio::test]
    async fn test_run_rewrites_contacts() {
        let repo = seeded().await;
        let job = ContactNormalizationJob::new(repo.clone(), PhoneNormalizer::new(Country::India));

        let report = job.run(false).await.unwrap();
        assert_eq!(report.processed, 3);
        assert_eq!(report.updated, 1);
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.invalid, 1);
        assert!(!report.has_errors());

        let stored = repo.find("a@example.com").await.unwrap().unwrap();
        assert_eq!(stored.contact_number.as_deref(), Some("+919876543210"));
        assert!(stored.is_contact_verified);

        let untouched = repo.find("c@example.com").await.unwrap().unwrap();
        assert_eq!(untouched.contact_number.as_deref(), Some("12"));
    }

    #[tokio::test]
    async fn test_preview_does_not_write() {
        let repo = seeded().await;
        let job = ContactNormalizationJob::new(repo.clone(), PhoneNormalizer::new(Country::India));

        let report = job.run(true).await.unwrap();
        assert_eq!(report.updated, 1);
        assert_eq!(
            report.changes,
            vec![ContactChange {
                identity_key: "a@example.com".to_string(),
                before: "98765 43210".to_string(),
                after: "+919876543210".to_string(),
            }]
        );

        let stored = repo.find("a@example.com").await.unwrap().unwrap();
        assert_eq!(stored.contact_number.as_deref(), Some("98765 43210"));
    }

    #[tokio::test]
    async fn test_colliding_canonical_forms_are_reported_not_duplicated() {
        let repo = Arc::new(InMemoryProfileRepository::new());
        repo.insert(profile("a@example.com", "98765 43210", false)).await;
        repo.insert(profile("b@example.com", "+919876543210", true)).await;
        let job = ContactNormalizationJob::new(repo.clone(), PhoneNormalizer::new(Country::India));

        let report = job.run(false).await.unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.updated, 0);
        assert!(report.has_errors());
        assert!(report.errors[0].starts_with("a@example.com"));

        let a = repo.find("a@example.com").await.unwrap().unwrap();
        let b = repo.find("b@example.com").await.unwrap().unwrap();
        assert_eq!(a.contact_number.as_deref(), Some("98765 43210"));
        assert_eq!(b.contact_number.as_deref(), Some("+919876543210"));
    }
}

