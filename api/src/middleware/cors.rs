//! CORS middleware configuration for the browser front-end.
//!
//! Development allows any origin for easy local testing; production
//! restricts to the configured origins. Credentials support is required
//! because the tokens travel in cookies.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use std::env;
use tracing::info;

/// Creates a CORS middleware instance configured for the current environment.
///
/// # Environment Variables
/// - `ENVIRONMENT`: set to "production" for production settings
/// - `ALLOWED_ORIGINS`: comma-separated allowed origins (production only)
/// - `CORS_MAX_AGE`: preflight cache lifetime (default: 3600 seconds)
pub fn create_cors() -> Cors {
    let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    let max_age = env::var("CORS_MAX_AGE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(3600);

    if environment == "production" {
        create_production_cors(max_age)
    } else {
        create_development_cors(max_age)
    }
}

fn create_development_cors(max_age: usize) -> Cors {
    info!("configuring CORS for development environment");

    Cors::permissive().max_age(max_age)
}

fn create_production_cors(max_age: usize) -> Cors {
    info!("configuring CORS for production environment");

    let allowed_origins = env::var("ALLOWED_ORIGINS").unwrap_or_default();

    let mut cors = Cors::default()
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
        ])
        .supports_credentials()
        .max_age(max_age);

    for origin in allowed_origins.split(',').filter(|o| !o.is_empty()) {
        cors = cors.allowed_origin(origin.trim());
    }

    cors
}
