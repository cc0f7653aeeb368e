use actix_web::HttpResponse;

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "contact-verify-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Handler for GET /api/v1/auth/ping
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "pong",
    }))
}

/// Default 404 handler
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(cv_shared::errors::ErrorResponse::new(
        cv_shared::errors::error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
