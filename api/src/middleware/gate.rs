//! Security-gate middleware.
//!
//! Wraps the core [`SecurityGate`] into an actix middleware. Two instances
//! guard the protected scopes: the access flavor and the refresh flavor,
//! each bound to its configured cookie slot. A passing gate replaces the
//! optimistically decoded claims in the request extensions with the verified
//! ones; a failing gate short-circuits with 401.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use sb_core::repositories::RevocationStore;
use sb_core::services::jwt::{DenyReason, GateDecision, JwtService, SecurityGate, TokenFlavor};

use crate::handlers::ApiError;
use crate::middleware::claims::{AccessTokenPayload, AuthenticatedUser, RefreshTokenPayload};

/// Security-gate middleware factory for one token flavor
pub struct JwtGate<S: RevocationStore> {
    gate: Arc<SecurityGate<S>>,
    cookie_name: String,
}

impl<S: RevocationStore> JwtGate<S> {
    /// Create a gate middleware bound to a configured cookie slot
    pub fn new(
        flavor: TokenFlavor,
        service: Arc<JwtService<S>>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            gate: Arc::new(SecurityGate::new(flavor, service)),
            cookie_name: cookie_name.into(),
        }
    }
}

impl<Srv, B, S> Transform<Srv, ServiceRequest> for JwtGate<S>
where
    Srv: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    Srv::Future: 'static,
    B: 'static,
    S: RevocationStore + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtGateMiddleware<Srv, S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: Srv) -> Self::Future {
        ready(Ok(JwtGateMiddleware {
            service: Rc::new(service),
            gate: Arc::clone(&self.gate),
            cookie_name: self.cookie_name.clone(),
        }))
    }
}

/// Security-gate middleware service
pub struct JwtGateMiddleware<Srv, S: RevocationStore> {
    service: Rc<Srv>,
    gate: Arc<SecurityGate<S>>,
    cookie_name: String,
}

impl<Srv, B, S> Service<ServiceRequest> for JwtGateMiddleware<Srv, S>
where
    Srv: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    Srv::Future: 'static,
    B: 'static,
    S: RevocationStore + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let gate = Arc::clone(&self.gate);
        let cookie_name = self.cookie_name.clone();

        Box::pin(async move {
            let raw = req.cookie(&cookie_name).map(|c| c.value().to_string());

            match gate.evaluate(raw.as_deref()).await {
                GateDecision::Allowed(claims) => {
                    req.extensions_mut()
                        .insert(AuthenticatedUser(claims.user_id));
                    match gate.flavor() {
                        TokenFlavor::Access => {
                            req.extensions_mut().insert(AccessTokenPayload(claims));
                        }
                        TokenFlavor::Refresh => {
                            req.extensions_mut().insert(RefreshTokenPayload(claims));
                        }
                    }
                    service.call(req).await
                }
                GateDecision::Denied(DenyReason::LoggedOutAllDevices) => {
                    Err(ApiError::LoggedOutAllDevices.into())
                }
                GateDecision::Denied(_) => Err(ApiError::Unauthorized.into()),
            }
        })
    }
}
