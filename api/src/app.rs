//! Application factory.
//!
//! Assembles the actix application: claim extraction runs for every request,
//! the two security gates guard the protected auth routes, and the shared
//! state carries the JWT service plus the credential-check collaborator.

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use sb_core::repositories::{RevocationStore, UserDirectory};
use sb_core::services::jwt::TokenFlavor;

use crate::middleware::{cors::create_cors, ExtractJwts, JwtGate};
use crate::routes::auth::{login, logout, logout_all, refresh, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<S, U>(
    app_state: web::Data<AppState<S, U>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: RevocationStore + 'static,
    U: UserDirectory + 'static,
{
    let jwt = app_state.jwt_service.clone();
    let cookies = app_state.cookies.clone();

    let extract = ExtractJwts::new(
        jwt.clone(),
        cookies.access_name.clone(),
        cookies.refresh_name.clone(),
    );
    let access_gate = || JwtGate::new(TokenFlavor::Access, jwt.clone(), cookies.access_name.clone());
    let refresh_gate = JwtGate::new(
        TokenFlavor::Refresh,
        jwt.clone(),
        cookies.refresh_name.clone(),
    );

    App::new()
        // Add application state
        .app_data(app_state.clone())
        // Middleware: logging outermost, then CORS, then claim extraction
        // (extraction must run before the route-level gates)
        .wrap(extract)
        .wrap(create_cors())
        .wrap(TracingLogger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/login", web::post().to(login::<S, U>))
                    .route(
                        "/refresh",
                        web::post().to(refresh::<S, U>).wrap(refresh_gate),
                    )
                    .route(
                        "/logout",
                        web::post().to(logout::<S, U>).wrap(access_gate()),
                    )
                    .route(
                        "/logout-all",
                        web::post().to(logout_all::<S, U>).wrap(access_gate()),
                    ),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "stockbase-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
