//! Cookie claim-extraction middleware.
//!
//! Pulls the raw token strings out of the two token cookies and attaches
//! optimistically decoded claims to the request for downstream handlers and
//! logging. Decoding here skips signature verification on purpose; nothing
//! attached by this middleware is authorization evidence, and the security
//! gate re-verifies before any protected handler runs. Absent or malformed
//! cookies are ignored silently - this middleware never blocks a request.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use sb_core::domain::entities::token::TokenClaims;
use sb_core::repositories::RevocationStore;
use sb_core::services::jwt::JwtService;

/// Unverified access-token claims attached by extraction; replaced with
/// verified claims once the access gate passes.
#[derive(Debug, Clone)]
pub struct AccessTokenPayload(pub TokenClaims);

/// Unverified refresh-token claims attached by extraction; replaced with
/// verified claims once the refresh gate passes.
#[derive(Debug, Clone)]
pub struct RefreshTokenPayload(pub TokenClaims);

/// Convenience projection of the user id from whichever token was present
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub i64);

macro_rules! extension_extractor {
    ($type:ty) => {
        impl FromRequest for $type {
            type Error = Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
                let result = req
                    .extensions()
                    .get::<$type>()
                    .cloned()
                    .ok_or_else(|| ErrorUnauthorized("Authentication required"));
                ready(result)
            }
        }
    };
}

extension_extractor!(AccessTokenPayload);
extension_extractor!(RefreshTokenPayload);
extension_extractor!(AuthenticatedUser);

/// Claim-extraction middleware factory
pub struct ExtractJwts<S: RevocationStore> {
    service: Arc<JwtService<S>>,
    access_cookie: String,
    refresh_cookie: String,
}

impl<S: RevocationStore> ExtractJwts<S> {
    /// Create the middleware for the two configured cookie slots
    pub fn new(
        service: Arc<JwtService<S>>,
        access_cookie: impl Into<String>,
        refresh_cookie: impl Into<String>,
    ) -> Self {
        Self {
            service,
            access_cookie: access_cookie.into(),
            refresh_cookie: refresh_cookie.into(),
        }
    }
}

impl<Srv, B, S> Transform<Srv, ServiceRequest> for ExtractJwts<S>
where
    Srv: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    Srv::Future: 'static,
    B: 'static,
    S: RevocationStore + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ExtractJwtsMiddleware<Srv, S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: Srv) -> Self::Future {
        ready(Ok(ExtractJwtsMiddleware {
            service: Rc::new(service),
            jwt: Arc::clone(&self.service),
            access_cookie: self.access_cookie.clone(),
            refresh_cookie: self.refresh_cookie.clone(),
        }))
    }
}

/// Claim-extraction middleware service
pub struct ExtractJwtsMiddleware<Srv, S: RevocationStore> {
    service: Rc<Srv>,
    jwt: Arc<JwtService<S>>,
    access_cookie: String,
    refresh_cookie: String,
}

impl<Srv, B, S> Service<ServiceRequest> for ExtractJwtsMiddleware<Srv, S>
where
    Srv: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    Srv::Future: 'static,
    B: 'static,
    S: RevocationStore + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Srv::Future;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(claims) = self.decode_cookie(&req, &self.access_cookie) {
            req.extensions_mut()
                .insert(AuthenticatedUser(claims.user_id));
            req.extensions_mut().insert(AccessTokenPayload(claims));
        }
        if let Some(claims) = self.decode_cookie(&req, &self.refresh_cookie) {
            req.extensions_mut()
                .insert(AuthenticatedUser(claims.user_id));
            req.extensions_mut().insert(RefreshTokenPayload(claims));
        }

        self.service.call(req)
    }
}

impl<Srv, S: RevocationStore> ExtractJwtsMiddleware<Srv, S> {
    fn decode_cookie(&self, req: &ServiceRequest, cookie_name: &str) -> Option<TokenClaims> {
        let cookie = req.cookie(cookie_name)?;
        self.jwt.codec().decode_unverified(cookie.value())
    }
}
