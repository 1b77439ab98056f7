//! Handler for POST /api/v1/auth/refresh

use actix_web::{web, HttpResponse};
use tracing::debug;

use sb_core::repositories::{RevocationStore, UserDirectory};

use crate::handlers::ApiError;
use crate::middleware::RefreshTokenPayload;

use super::{token_cookie, AppState};

/// Rotate the token pair presented in the refresh cookie.
///
/// Guarded by the refresh-flavor security gate, so the payload extracted
/// here carries verified claims. The rotated access token gets a new
/// lifetime; the rotated refresh cookie keeps the original absolute expiry.
/// The family's accepted generation is advanced only after rotation
/// succeeds.
pub async fn refresh<S, U>(
    state: web::Data<AppState<S, U>>,
    payload: RefreshTokenPayload,
) -> Result<HttpResponse, ApiError>
where
    S: RevocationStore + 'static,
    U: UserDirectory + 'static,
{
    let current = payload.0;

    let pair = state
        .jwt_service
        .refresh_token_pair(&current)
        .map_err(|_| ApiError::Internal)?;

    let new_claims = state
        .jwt_service
        .codec()
        .decode_unverified(&pair.token)
        .ok_or(ApiError::Internal)?;

    state
        .jwt_service
        .record_generation(&new_claims.fam, new_claims.gen)
        .await;

    debug!(
        user_id = new_claims.user_id,
        family = %new_claims.fam,
        gen = new_claims.gen,
        "token pair rotated"
    );

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
        .json(new_claims))
}
