//! Handler for POST /api/v1/auth/logout-all

use actix_web::{web, HttpResponse};
use tracing::info;

use sb_core::repositories::{RevocationStore, UserDirectory};

use crate::dto::auth::LogoutResponse;
use crate::handlers::ApiError;
use crate::middleware::AuthenticatedUser;

use super::AppState;

/// Log the user out of every device.
///
/// Records a logout-all epoch; any token issued to this user before now is
/// denied from here on, across every family. Cookies are intentionally left
/// in place: the epoch check makes them dead regardless of client state.
pub async fn logout_all<S, U>(
    state: web::Data<AppState<S, U>>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError>
where
    S: RevocationStore + 'static,
    U: UserDirectory + 'static,
{
    state.jwt_service.logout_all_devices(user.0).await;
    info!(user_id = user.0, "user logged out from all devices");

    Ok(HttpResponse::Ok().json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}
