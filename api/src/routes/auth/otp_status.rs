use actix_web::{web, HttpResponse};

use crate::dto::{OtpStatusQuery, OtpStatusResponse};
use crate::handlers::ApiError;
use crate::state::AppState;

/// Handler for GET /api/v1/auth/otp-status/{messageId}
///
/// `?provider=` selects the provider to ask; the primary one otherwise.
pub async fn otp_status(
    state: web::Data<AppState>,
    message_id: web::Path<String>,
    query: web::Query<OtpStatusQuery>,
) -> Result<HttpResponse, ApiError> {
    let status = state
        .verification
        .delivery_status(&message_id, query.provider.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(OtpStatusResponse::from(status)))
}
