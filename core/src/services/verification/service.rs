//! Main verification service implementation

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use cv_shared::utils::phone::mask_phone_number;
use cv_shared::utils::validation::{is_valid_otp_code, not_blank};

use crate::domain::entities::{OtpChallenge, UserProfile};
use crate::domain::value_objects::DeliveryStatus;
use crate::errors::{DomainError, DomainResult, OtpError, ValidationError};
use crate::repositories::{ChallengeStore, ProfileRepository, Reservation};
use crate::services::delivery::DeliveryChain;
use crate::services::otp::{evaluate, generate_code, VerificationOutcome};
use crate::services::phone::PhoneNormalizer;

use super::config::VerificationServiceConfig;
use super::types::StartVerificationResult;

/// Orchestrates challenge issuance, delivery and verification
///
/// Challenges are filed under the caller's identity key. The store is the
/// single owner of challenge state; this service reads a record, decides,
/// and applies the decision with a conditional write so concurrent
/// requests on the same key cannot overwrite each other.
pub struct VerificationService<S: ChallengeStore + ?Sized, P: ProfileRepository + ?Sized> {
    store: Arc<S>,
    profiles: Arc<P>,
    delivery: DeliveryChain,
    normalizer: PhoneNormalizer,
    config: VerificationServiceConfig,
}

impl<S: ChallengeStore + ?Sized, P: ProfileRepository + ?Sized> VerificationService<S, P> {
    pub fn new(
        store: Arc<S>,
        profiles: Arc<P>,
        delivery: DeliveryChain,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            store,
            profiles,
            delivery,
            normalizer: PhoneNormalizer::new(config.default_country),
            config,
        }
    }

    pub fn normalizer(&self) -> &PhoneNormalizer {
        &self.normalizer
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Create the caller's profile on first login or refresh its name
    pub async fn register_login(&self, identity_key: &str, name: Option<String>) -> DomainResult<UserProfile> {
        let profile = self.profiles.upsert(identity_key, name).await?;
        info!(event = "profile_upserted", identity = identity_key, "User profile upserted");
        Ok(profile)
    }

    pub async fn profile(&self, identity_key: &str) -> DomainResult<UserProfile> {
        self.profiles
            .find(identity_key)
            .await?
            .ok_or_else(|| DomainError::not_found("user profile"))
    }

    /// Store a new contact number for the caller
    ///
    /// The number is kept in canonical form and marked unverified. Any
    /// challenge in flight for the old number is discarded.
    pub async fn update_contact(&self, identity_key: &str, raw_contact: &str) -> DomainResult<UserProfile> {
        if !not_blank(raw_contact) {
            return Err(ValidationError::RequiredField {
                field: "contactNumber".to_string(),
            }
            .into());
        }

        let canonical = self.normalizer.normalize_valid(raw_contact)?;
        self.profile(identity_key).await?;

        if let Some(owner) = self.profiles.find_by_contact(&canonical).await? {
            if owner.identity_key != identity_key {
                warn!(
                    event = "contact_conflict",
                    phone = %mask_phone_number(&canonical),
                    "Contact number already registered to another account"
                );
                return Err(DomainError::Conflict {
                    message: "Contact number is already registered to another account".to_string(),
                });
            }
        }

        let updated = self.profiles.update_contact(identity_key, &canonical, false).await?;
        self.store.remove(identity_key).await?;
        info!(
            event = "contact_updated",
            identity = identity_key,
            phone = %mask_phone_number(&canonical),
            "Contact number updated"
        );
        Ok(updated)
    }

    /// Issue a challenge for the caller's stored contact number and deliver it
    ///
    /// Rejected while a live challenge exists for the caller; the existing
    /// challenge is left untouched. If every provider fails the new
    /// challenge is withdrawn so the caller can retry immediately.
    pub async fn start_verification(&self, identity_key: &str) -> DomainResult<StartVerificationResult> {
        let profile = self.profile(identity_key).await?;
        let contact = profile.contact().ok_or_else(|| ValidationError::RequiredField {
            field: "contactNumber".to_string(),
        })?;
        if profile.is_contact_verified {
            return Err(OtpError::AlreadyVerified.into());
        }

        let target = self.normalizer.normalize_valid(contact)?;
        let now = Utc::now();
        let challenge = OtpChallenge::create_at(
            generate_code(),
            target.clone(),
            self.config.code_expiration_minutes,
            self.config.max_attempts,
            now,
        );

        if let Reservation::Occupied(existing) = self
            .store
            .insert_if_vacant(identity_key, challenge.clone(), now)
            .await?
        {
            let remaining_minutes = existing.remaining_minutes_at(now);
            warn!(
                event = "otp_already_pending",
                identity = identity_key,
                remaining_minutes,
                "Verification requested while a challenge is still live"
            );
            return Err(OtpError::ChallengeInFlight {
                remaining_minutes,
                expires_at: existing.expires_at,
            }
            .into());
        }

        let receipt = match self.delivery.deliver(&target, &challenge.code).await {
            Ok(receipt) => receipt,
            Err(delivery_error) => {
                if let Err(e) = self.store.remove_if_current(identity_key, &challenge).await {
                    error!(
                        event = "otp_withdraw_failed",
                        identity = identity_key,
                        error = %e,
                        "Failed to withdraw undelivered challenge"
                    );
                }
                error!(
                    event = "otp_delivery_failed",
                    identity = identity_key,
                    phone = %mask_phone_number(&target),
                    providers = delivery_error.failures().len(),
                    "All SMS providers failed"
                );
                return Err(delivery_error.into());
            }
        };

        info!(
            event = "otp_issued",
            identity = identity_key,
            provider = %receipt.provider,
            expires_at = %challenge.expires_at,
            "Verification challenge issued"
        );

        Ok(StartVerificationResult {
            expires_at: challenge.expires_at,
            message_id: receipt.message_id().map(str::to_string),
            provider: receipt.provider,
            sent_to: self.normalizer.format_for_display(&target),
            code: self.config.expose_code.then(|| challenge.code.clone()),
            failed_attempts: receipt.failed_attempts,
        })
    }

    /// Discard any challenge for the caller, then start over
    pub async fn resend(&self, identity_key: &str) -> DomainResult<StartVerificationResult> {
        let discarded = self.store.remove(identity_key).await?;
        info!(event = "otp_resend", identity = identity_key, discarded, "Resending verification code");
        self.start_verification(identity_key).await
    }

    /// Check a submitted code and mark the contact verified on success
    pub async fn verify(&self, identity_key: &str, code: &str) -> DomainResult<UserProfile> {
        if !is_valid_otp_code(code) {
            return Err(ValidationError::InvalidOtpFormat.into());
        }

        // Every lost conditional write means another request advanced the
        // record, which can only happen a bounded number of times.
        let max_rounds = self.config.max_attempts as usize + 2;
        for _ in 0..max_rounds {
            let current = self
                .store
                .get(identity_key)
                .await?
                .ok_or(OtpError::NoActiveChallenge)?;

            match evaluate(&current, code, Utc::now()) {
                VerificationOutcome::Accepted => {
                    if !self.store.remove_if_current(identity_key, &current).await? {
                        continue;
                    }
                    let profile = self.profiles.mark_contact_verified(identity_key).await?;
                    info!(
                        event = "otp_verified",
                        identity = identity_key,
                        phone = %mask_phone_number(&current.target),
                        "Contact number verified"
                    );
                    return Ok(profile);
                }
                VerificationOutcome::Expired => {
                    self.store.remove_if_current(identity_key, &current).await?;
                    info!(event = "otp_expired", identity = identity_key, "Expired challenge purged");
                    return Err(OtpError::Expired.into());
                }
                VerificationOutcome::LockedOut { attempts } => {
                    if !self.store.remove_if_current(identity_key, &current).await? {
                        continue;
                    }
                    warn!(
                        event = "otp_locked_out",
                        identity = identity_key,
                        attempts,
                        "Verification attempts exhausted"
                    );
                    return Err(OtpError::LockedOut.into());
                }
                VerificationOutcome::Rejected {
                    attempts,
                    attempts_remaining,
                } => {
                    let updated = current.with_attempts(attempts);
                    if !self.store.replace_if_current(identity_key, &current, updated).await? {
                        continue;
                    }
                    info!(
                        event = "otp_rejected",
                        identity = identity_key,
                        attempts,
                        attempts_remaining,
                        "Verification code mismatch"
                    );
                    return Err(OtpError::InvalidCode { attempts_remaining }.into());
                }
            }
        }

        Err(DomainError::internal("challenge kept changing during verification"))
    }

    /// Provider-side status of a sent message; read-only
    pub async fn delivery_status(&self, message_id: &str, provider: Option<&str>) -> DomainResult<DeliveryStatus> {
        if !not_blank(message_id) {
            return Err(ValidationError::RequiredField {
                field: "messageId".to_string(),
            }
            .into());
        }
        self.delivery.delivery_status(message_id.trim(), provider).await
    }
}
