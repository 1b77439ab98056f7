//! Handler for POST /api/v1/auth/login

use actix_web::{web, HttpResponse};
use tracing::info;
use validator::Validate;

use sb_core::domain::entities::token::CreationClaims;
use sb_core::repositories::{RevocationStore, UserDirectory};

use crate::dto::auth::LoginRequest;
use crate::handlers::ApiError;

use super::{token_cookie, AppState};

/// Authenticate with email and password and issue a fresh token pair.
///
/// A successful login starts a new token family at generation 0. Both tokens
/// are attached as http-only cookies; the response body carries the decoded
/// access claims for client convenience.
///
/// # Errors
/// - 400: body fails validation
/// - 401: unknown account or wrong password (indistinguishable by design)
pub async fn login<S, U>(
    state: web::Data<AppState<S, U>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError>
where
    S: RevocationStore + 'static,
    U: UserDirectory + 'static,
{
    request
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let account = state
        .user_directory
        .verify_credentials(&request.email, &request.password)
        .await
        .map_err(|_| ApiError::Internal)?
        .ok_or(ApiError::InvalidCredentials)?;

    let pair = state
        .jwt_service
        .create_token_pair(CreationClaims {
            user_id: account.id,
        })
        .map_err(|_| ApiError::Internal)?;

    let claims = state
        .jwt_service
        .codec()
        .decode_unverified(&pair.token)
        .ok_or(ApiError::Internal)?;

    info!(user_id = account.id, family = %claims.fam, "user logged in");

    Ok(HttpResponse::Ok()
        .cookie(token_cookie(
            &state.cookies.access_name,
            &pair.token,
            pair.token_expires_at,
            &state.cookies,
        ))
        .cookie(token_cookie(
            &state.cookies.refresh_name,
            &pair.refresh_token,
            pair.refresh_expires_at,
            &state.cookies,
        ))
        .json(claims))
}
