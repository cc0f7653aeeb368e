//! Application factory
//!
//! Builds the actix-web `App` from prepared state. `main.rs` wraps it in an
//! `HttpServer`; integration tests initialise it directly.

use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::{JsonPayloadError, QueryPayloadError},
    web, App, Error, HttpRequest,
};
use std::sync::Arc;

use crate::handlers::ApiError;
use crate::middleware::IdentityAuth;
use crate::routes::auth::{contact, login, otp_status, resend_otp, send_otp, verify_otp};
use crate::routes::health::{health_check, not_found, ping};
use crate::state::AppState;

/// Create the application with every route registered
///
/// Middleware such as CORS and request tracing is added by the caller so
/// tests can run the bare app.
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    let verifier = Arc::clone(&app_state.identity);

    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/ping", web::get().to(ping))
                    .service(
                        web::scope("")
                            .wrap(IdentityAuth::new(verifier))
                            .route("/login", web::post().to(login::login))
                            .route("/contact", web::put().to(contact::update_contact))
                            .route("/send-otp", web::post().to(send_otp::send_otp))
                            .route("/verify-otp", web::post().to(verify_otp::verify_otp))
                            .route("/resend-otp", web::post().to(resend_otp::resend_otp))
                            .route("/otp-status/{message_id}", web::get().to(otp_status::otp_status)),
                    ),
            ),
        )
        .default_service(web::route().to(not_found))
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    tracing::debug!(event = "invalid_json_body", error = %err, "Rejected request body");
    ApiError::invalid_field("body").into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    tracing::debug!(event = "invalid_query", error = %err, "Rejected query string");
    ApiError::invalid_field("query").into()
}
