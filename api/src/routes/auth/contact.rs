use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{ProfileResponse, UpdateContactRequest};
use crate::handlers::ApiError;
use crate::middleware::AuthenticatedIdentity;
use crate::state::AppState;

/// Handler for PUT /api/v1/auth/contact
///
/// # Request Body
///
/// ```json
/// { "contactNumber": "98765 43210" }
/// ```
///
/// The number is stored in canonical form and must be verified again.
pub async fn update_contact(
    state: web::Data<AppState>,
    identity: AuthenticatedIdentity,
    request: web::Json<UpdateContactRequest>,
) -> Result<HttpResponse, ApiError> {
    if request.validate().is_err() {
        return Err(ApiError::invalid_field("contactNumber"));
    }

    let profile = state
        .verification
        .update_contact(identity.key(), &request.contact_number)
        .await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::new(profile)))
}
