//! Background removal of expired challenges

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::errors::DomainError;
use crate::repositories::ChallengeStore;

/// Configuration for the expiry sweeper
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// How often to sweep
    pub interval: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
        }
    }
}

/// Periodically purges expired challenges from a store
///
/// Runs off the request path. A sweep racing a request on the same key is
/// harmless: both converge on the key being absent.
pub struct ExpirySweeper<S: ChallengeStore + ?Sized + 'static> {
    store: Arc<S>,
    config: SweeperConfig,
}

impl<S: ChallengeStore + ?Sized + 'static> ExpirySweeper<S> {
    pub fn new(store: Arc<S>, config: SweeperConfig) -> Self {
        Self { store, config }
    }

    /// Run a single sweep, returning how many challenges were removed
    pub async fn run_once(&self) -> Result<usize, DomainError> {
        let removed = self.store.sweep_expired(Utc::now()).await?;
        if removed > 0 {
            info!(event = "otp_sweep_completed", removed, "Expired OTP challenges purged");
        } else {
            debug!(event = "otp_sweep_completed", removed, "No expired OTP challenges");
        }
        Ok(removed)
    }

    /// Spawn the sweep loop on the current tokio runtime
    ///
    /// The first sweep runs one full interval after start.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                interval_secs = self.config.interval.as_secs(),
                "OTP expiry sweeper started"
            );
            let start = tokio::time::Instant::now() + self.config.interval;
            let mut timer = tokio::time::interval_at(start, self.config.interval);

            loop {
                timer.tick().await;
                if let Err(e) = self.run_once().await {
                    error!(event = "otp_sweep_failed", error = %e, "OTP expiry sweep failed");
                }
            }
        })
    }
}
