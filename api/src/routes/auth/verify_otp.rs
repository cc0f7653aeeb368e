use actix_web::{web, HttpResponse};

use crate::dto::{VerifyOtpRequest, VerifyOtpResponse};
use crate::handlers::ApiError;
use crate::middleware::AuthenticatedIdentity;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/verify-otp
///
/// # Request Body
///
/// ```json
/// { "otp": "482913" }
/// ```
///
/// ## Errors
/// - 400 `OTP_INVALID` with `attemptsRemaining`
/// - 410 `OTP_EXPIRED`
/// - 429 `OTP_LOCKED_OUT` once attempts are exhausted
pub async fn verify_otp(
    state: web::Data<AppState>,
    identity: AuthenticatedIdentity,
    request: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse, ApiError> {
    let profile = state.verification.verify(identity.key(), &request.otp).await?;
    Ok(HttpResponse::Ok().json(VerifyOtpResponse::new(profile)))
}
