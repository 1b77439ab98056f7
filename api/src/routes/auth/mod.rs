//! Auth routes: login, refresh, logout, logout-all.

pub mod login;
pub mod logout;
pub mod logout_all;
pub mod refresh;

pub use login::login;
pub use logout::logout;
pub use logout_all::logout_all;
pub use refresh::refresh;

use std::sync::Arc;

use actix_web::cookie::{time::OffsetDateTime, Cookie, SameSite};

use sb_core::repositories::{RevocationStore, UserDirectory};
use sb_core::services::jwt::JwtService;
use sb_shared::config::CookieConfig;

/// Shared application state injected into the auth handlers
pub struct AppState<S: RevocationStore, U: UserDirectory> {
    /// Token lifecycle manager, also exposed to the gate middleware
    pub jwt_service: Arc<JwtService<S>>,
    /// Credential-check collaborator
    pub user_directory: Arc<U>,
    /// Cookie flag policy
    pub cookies: CookieConfig,
}

impl<S: RevocationStore, U: UserDirectory> AppState<S, U> {
    pub fn new(
        jwt_service: Arc<JwtService<S>>,
        user_directory: Arc<U>,
        cookies: CookieConfig,
    ) -> Self {
        Self {
            jwt_service,
            user_directory,
            cookies,
        }
    }
}

/// Build a token cookie with the configured security flags and an absolute
/// expiry taken from the token itself.
pub(crate) fn token_cookie(
    name: &str,
    value: &str,
    expires_at: i64,
    config: &CookieConfig,
) -> Cookie<'static> {
    let mut builder = Cookie::build(name.to_owned(), value.to_owned())
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .domain(config.domain.clone())
        .same_site(SameSite::Lax);

    if let Ok(expires) = OffsetDateTime::from_unix_timestamp(expires_at) {
        builder = builder.expires(expires);
    }

    builder.finish()
}

/// Build a removal cookie clearing the given slot
pub(crate) fn removal_cookie(name: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_owned(), "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}
