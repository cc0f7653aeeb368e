use actix_web::{web, HttpResponse};

use crate::dto::SendOtpResponse;
use crate::handlers::ApiError;
use crate::middleware::AuthenticatedIdentity;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/resend-otp
///
/// Discards any outstanding code before sending a new one.
pub async fn resend_otp(
    state: web::Data<AppState>,
    identity: AuthenticatedIdentity,
) -> Result<HttpResponse, ApiError> {
    let result = state.verification.resend(identity.key()).await?;
    Ok(HttpResponse::Ok().json(SendOtpResponse::from(result)))
}
