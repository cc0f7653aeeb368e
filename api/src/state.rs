//! Shared application state

use std::sync::Arc;

use cv_core::repositories::{ChallengeStore, ProfileRepository};
use cv_core::services::identity::IdentityVerifier;
use cv_core::services::verification::VerificationService;

/// Verification service over whichever store and repository were configured
pub type AppService = VerificationService<dyn ChallengeStore, dyn ProfileRepository>;

/// State handed to every handler through `web::Data`
pub struct AppState {
    pub verification: Arc<AppService>,
    pub identity: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(verification: Arc<AppService>, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            verification,
            identity,
        }
    }
}
