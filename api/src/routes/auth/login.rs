use actix_web::{web, HttpResponse};

use crate::dto::ProfileResponse;
use crate::handlers::ApiError;
use crate::middleware::AuthenticatedIdentity;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Creates the caller's profile on first login and refreshes the display
/// name afterwards.
pub async fn login(
    state: web::Data<AppState>,
    identity: AuthenticatedIdentity,
) -> Result<HttpResponse, ApiError> {
    let profile = state
        .verification
        .register_login(identity.key(), identity.0.name.clone())
        .await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::new(profile)))
}
