//! CORS configuration
//!
//! Development is permissive. Elsewhere only origins listed in
//! `ALLOWED_ORIGINS` (comma separated) may call the API.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use std::env;

use cv_shared::config::Environment;

/// Build the CORS middleware for `environment`
///
/// `CORS_MAX_AGE` sets the preflight cache lifetime in seconds (default 3600).
pub fn create_cors(environment: Environment) -> Cors {
    let max_age = env::var("CORS_MAX_AGE")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(3600);

    if environment.is_development() {
        create_development_cors(max_age)
    } else {
        create_restricted_cors(max_age, allowed_origins())
    }
}

fn create_development_cors(max_age: usize) -> Cors {
    tracing::info!(event = "cors_configured", mode = "development", "Permissive CORS enabled");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .max_age(max_age)
        .supports_credentials()
}

fn create_restricted_cors(max_age: usize, origins: Vec<String>) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(max_age);

    for origin in &origins {
        tracing::info!(event = "cors_origin_allowed", origin = %origin, "Allowing CORS origin");
        cors = cors.allowed_origin(origin);
    }
    cors
}

fn allowed_origins() -> Vec<String> {
    env::var("ALLOWED_ORIGINS")
        .map(|list| parse_origins(&list))
        .unwrap_or_default()
}

fn parse_origins(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
