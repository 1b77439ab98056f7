//! Handler for POST /api/v1/auth/logout

use actix_web::{web, HttpResponse};
use tracing::{error, info};

use sb_core::repositories::{RevocationStore, UserDirectory};

use crate::dto::auth::LogoutResponse;
use crate::handlers::ApiError;
use crate::middleware::{AccessTokenPayload, RefreshTokenPayload};

use super::{removal_cookie, AppState};

/// Log out the current device by blacklisting the token family.
///
/// Guarded by the access-flavor security gate. The family id is taken from
/// whichever payload is attached; blacklisting it kills both halves of the
/// pair and every generation descended from this login. Both cookie slots
/// are cleared.
pub async fn logout<S, U>(
    state: web::Data<AppState<S, U>>,
    access: Option<AccessTokenPayload>,
    refresh: Option<RefreshTokenPayload>,
) -> Result<HttpResponse, ApiError>
where
    S: RevocationStore + 'static,
    U: UserDirectory + 'static,
{
    let fam = access
        .map(|p| p.0.fam)
        .or_else(|| refresh.map(|p| p.0.fam))
        .ok_or_else(|| {
            error!("logout reached without a token payload despite the gate");
            ApiError::Unauthorized
        })?;

    state.jwt_service.logout_family(&fam).await;
    info!(family = %fam, "family logged out");

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(&state.cookies.access_name))
        .cookie(removal_cookie(&state.cookies.refresh_name))
        .json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }))
}
