//! Startup wiring shared by the server and maintenance binaries

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

use cv_core::repositories::{ChallengeStore, InMemoryChallengeStore, InMemoryProfileRepository, ProfileRepository};
use cv_core::services::delivery::{DeliveryChain, DeliveryPolicy};
use cv_core::services::otp::{ExpirySweeper, SweeperConfig};
use cv_core::services::verification::{VerificationService, VerificationServiceConfig};
use cv_infra::cache::RedisChallengeStore;
use cv_infra::database::{DatabasePool, MySqlProfileRepository};
use cv_infra::sms::build_providers;
use cv_shared::config::{AppConfig, CacheConfig, ChallengeStoreKind, DatabaseConfig, OtpConfig};

use crate::state::AppService;

/// Profile repository backed by MySQL when configured, memory otherwise
pub async fn profile_repository(database: Option<&DatabaseConfig>) -> anyhow::Result<Arc<dyn ProfileRepository>> {
    match database {
        Some(config) => {
            let pool = DatabasePool::new(config)
                .await
                .context("failed to connect to the profile database")?;
            pool.ensure_schema().await.context("failed to prepare the profile schema")?;
            Ok(Arc::new(MySqlProfileRepository::new(pool.get_pool().clone())))
        }
        None => {
            tracing::warn!(
                event = "profile_store_in_memory",
                "DATABASE_URL not set; user profiles are kept in memory"
            );
            Ok(Arc::new(InMemoryProfileRepository::new()))
        }
    }
}

/// Challenge store selected by `CHALLENGE_STORE`
///
/// The in-memory store gets a background sweeper; Redis expires entries
/// by TTL.
pub async fn challenge_store(cache: &CacheConfig, otp: &OtpConfig) -> anyhow::Result<Arc<dyn ChallengeStore>> {
    match cache.store {
        ChallengeStoreKind::Redis => {
            let store = RedisChallengeStore::connect(cache)
                .await
                .context("failed to connect to the Redis challenge store")?;
            Ok(Arc::new(store))
        }
        ChallengeStoreKind::Memory => {
            let store = Arc::new(InMemoryChallengeStore::new());
            ExpirySweeper::new(
                Arc::clone(&store),
                SweeperConfig {
                    interval: Duration::from_secs(otp.sweep_interval_secs),
                },
            )
            .start();
            Ok(store as Arc<dyn ChallengeStore>)
        }
    }
}

/// Build the verification service from configuration
pub async fn verification_service(config: &AppConfig) -> anyhow::Result<Arc<AppService>> {
    config.otp.validate().context("invalid OTP configuration")?;

    let providers = build_providers(&config.sms).await?;
    let delivery = DeliveryChain::new(
        providers,
        DeliveryPolicy {
            fallback_enabled: config.sms.fallback_enabled,
            provider_timeout: config.sms.request_timeout(),
        },
    );

    let service_config = VerificationServiceConfig::from_otp_config(&config.otp, config.expose_codes())
        .context("invalid DEFAULT_COUNTRY")?;
    let store = challenge_store(&config.cache, &config.otp).await?;
    let profiles = profile_repository(config.database.as_ref()).await?;

    Ok(Arc::new(VerificationService::new(store, profiles, delivery, service_config)))
}
