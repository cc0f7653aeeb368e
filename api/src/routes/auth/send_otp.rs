use actix_web::{web, HttpResponse};

use crate::dto::SendOtpResponse;
use crate::handlers::ApiError;
use crate::middleware::AuthenticatedIdentity;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/send-otp
///
/// Sends a code to the caller's registered contact number.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "OTP sent successfully to +91 98765 43210",
///     "expiresAt": "2025-08-14T10:10:00Z",
///     "provider": "twilio",
///     "messageId": "SM...",
///     "sentTo": "+91 98765 43210"
/// }
/// ```
///
/// ## Errors
/// - 409 `OTP_ALREADY_SENT` while a previous code is still live
/// - 502 `SMS_DELIVERY_FAILED` with one entry per provider tried
pub async fn send_otp(
    state: web::Data<AppState>,
    identity: AuthenticatedIdentity,
) -> Result<HttpResponse, ApiError> {
    let result = state.verification.start_verification(identity.key()).await?;
    Ok(HttpResponse::Ok().json(SendOtpResponse::from(result)))
}
