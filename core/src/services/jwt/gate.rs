//! Request-time security gate for protected endpoints.
//!
//! One gate instance exists per credential flavor (access and refresh). The
//! gate runs a fixed sequence of checks against the codec and the revocation
//! store and returns a terminal decision; there are no retries and the only
//! side effect, defensive family blacklisting, is idempotent, so the gate is
//! safe to call concurrently and repeatedly for the same token.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::token::TokenClaims;
use crate::repositories::RevocationStore;

use super::service::JwtService;

/// Which credential a gate instance inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFlavor {
    /// Short-lived access token, cookie `token`
    Access,
    /// Long-lived refresh token, cookie `refreshToken`
    Refresh,
}

impl TokenFlavor {
    /// Cookie slot this flavor is transported in
    pub fn cookie_name(&self) -> &'static str {
        match self {
            TokenFlavor::Access => "token",
            TokenFlavor::Refresh => "refreshToken",
        }
    }
}

/// Why the gate refused a credential.
///
/// Callers collapse every variant to one generic unauthorized response
/// except `LoggedOutAllDevices`, which may carry a distinct user-facing
/// message. The variant itself is only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    MissingCredential,
    SignatureInvalid,
    TokenBlacklisted,
    FamilyBlacklisted,
    GenerationMismatch,
    LoggedOutAllDevices,
}

/// Terminal outcome of one gate evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Credential passed every check; carries the verified claims
    Allowed(TokenClaims),
    /// Credential refused
    Denied(DenyReason),
}

impl GateDecision {
    /// Whether the request may proceed
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed(_))
    }
}

/// Decision function gating one credential flavor.
///
/// Built once per flavor and shared across requests; the routing layer wraps
/// it into middleware.
pub struct SecurityGate<S: RevocationStore> {
    flavor: TokenFlavor,
    service: Arc<JwtService<S>>,
}

impl<S: RevocationStore> SecurityGate<S> {
    /// Create a gate for the given flavor over a shared JWT service
    pub fn new(flavor: TokenFlavor, service: Arc<JwtService<S>>) -> Self {
        Self { flavor, service }
    }

    /// The credential flavor this gate inspects
    pub fn flavor(&self) -> TokenFlavor {
        self.flavor
    }

    /// Run the gate against a raw token string from the request transport.
    ///
    /// Check order: presence, signature/TTL, token blacklist, family
    /// blacklist, generation match, logout-all epoch. A generation mismatch
    /// in either direction burns the whole family before denying; a
    /// signature failure burns the family too when one is recoverable from
    /// the unverified claims.
    pub async fn evaluate(&self, raw: Option<&str>) -> GateDecision {
        let cookie = self.flavor.cookie_name();

        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                warn!(cookie, "credential missing from request");
                return GateDecision::Denied(DenyReason::MissingCredential);
            }
        };

        let claims = match self.service.codec().verify(raw) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(cookie, error = %e, "token failed signature verification");
                // Tamper path: punish presentation of a forged-but-parseable
                // token by burning its claimed family.
                if let Some(unverified) = self.service.codec().decode_unverified(raw) {
                    self.service.logout_family(&unverified.fam).await;
                }
                return GateDecision::Denied(DenyReason::SignatureInvalid);
            }
        };

        if self.service.is_token_blacklisted(raw).await {
            warn!(cookie, "blacklisted token used");
            return GateDecision::Denied(DenyReason::TokenBlacklisted);
        }

        if self.service.is_family_blacklisted(&claims.fam).await {
            warn!(cookie, family = %claims.fam, "token with blacklisted family used");
            return GateDecision::Denied(DenyReason::FamilyBlacklisted);
        }

        // Unrecorded family means generation 0. Any mismatch, stale or from
        // the future, breaks the family's chain of trust; burn it rather than
        // allow silent retry.
        let last_gen = self.service.last_generation(&claims.fam).await.unwrap_or(0);
        if last_gen != claims.gen {
            warn!(
                cookie,
                family = %claims.fam,
                last_gen,
                gen = claims.gen,
                "token generation mismatch - blacklisting family"
            );
            self.service.logout_family(&claims.fam).await;
            return GateDecision::Denied(DenyReason::GenerationMismatch);
        }

        if self.service.issued_before_logout_all(&claims).await {
            debug!(cookie, user_id = claims.user_id, "token predates logout-all epoch");
            return GateDecision::Denied(DenyReason::LoggedOutAllDevices);
        }

        GateDecision::Allowed(claims)
    }
}
