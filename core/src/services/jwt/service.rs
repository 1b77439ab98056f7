//! Token lifecycle manager: pair issuance, rotation, revocation orchestration.

use std::sync::Arc;

use tracing::{error, warn};
use uuid::Uuid;

use crate::domain::entities::token::{CreationClaims, TokenClaims, TokenPair};
use crate::errors::DomainError;
use crate::repositories::RevocationStore;

use super::codec::TokenCodec;
use super::config::JwtServiceConfig;

/// Service for issuing, rotating and revoking JWT token pairs.
///
/// Pair creation and rotation are pure: they sign tokens and never touch the
/// store. Revocation queries and writes go through the injected
/// [`RevocationStore`]. Every yes/no revocation question asked here is
/// fail-closed: if the store errors, the answer is the one that denies.
pub struct JwtService<S: RevocationStore> {
    store: Arc<S>,
    codec: TokenCodec,
    config: JwtServiceConfig,
}

impl<S: RevocationStore> JwtService<S> {
    /// Create a new JWT service over the given revocation store
    pub fn new(store: Arc<S>, config: JwtServiceConfig) -> Self {
        let codec = TokenCodec::new(&config.secret);
        Self {
            store,
            codec,
            config,
        }
    }

    /// The codec used for signing and verification
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Issue a token pair for a fresh family at generation 0 (login)
    pub fn create_token_pair(&self, creation: CreationClaims) -> Result<TokenPair, DomainError> {
        let family = Uuid::new_v4().to_string();
        self.create_token_pair_in_family(creation, &family, 0)
    }

    /// Issue a token pair inside an existing family at a given generation.
    ///
    /// Both halves share the `(user_id, fam, gen)` triple but are signed with
    /// their own TTLs. No store interaction.
    pub fn create_token_pair_in_family(
        &self,
        creation: CreationClaims,
        family: &str,
        generation: u32,
    ) -> Result<TokenPair, DomainError> {
        let access =
            TokenClaims::issue_now(creation.user_id, family, generation, self.config.access_ttl_secs);
        let refresh = TokenClaims::issue_now(
            creation.user_id,
            family,
            generation,
            self.config.refresh_ttl_secs,
        );

        Ok(TokenPair {
            token: self.codec.encode_claims(&access)?,
            refresh_token: self.codec.encode_claims(&refresh)?,
            token_expires_at: access.exp,
            refresh_expires_at: refresh.exp,
        })
    }

    /// Rotate a pair from a verified refresh payload.
    ///
    /// The access token gets a brand-new lifetime; the refresh token keeps
    /// its original `iat` and absolute expiry, only the generation stamp
    /// advances. Pure: the caller persists the new generation via
    /// [`record_generation`](Self::record_generation) once rotation succeeds.
    pub fn refresh_token_pair(&self, current: &TokenClaims) -> Result<TokenPair, DomainError> {
        let gen = current.gen + 1;

        let access = TokenClaims::issue_now(
            current.user_id,
            &current.fam,
            gen,
            self.config.access_ttl_secs,
        );
        let refresh = TokenClaims {
            user_id: current.user_id,
            fam: current.fam.clone(),
            gen,
            iat: current.iat,
            exp: current.exp,
        };

        Ok(TokenPair {
            token: self.codec.encode_claims(&access)?,
            refresh_token: self.codec.encode_claims(&refresh)?,
            token_expires_at: access.exp,
            refresh_expires_at: refresh.exp,
        })
    }

    /// Whether this token string is blacklisted. Fail-closed: a store error
    /// or an unparseable token string counts as blacklisted.
    pub async fn is_token_blacklisted(&self, token: &str) -> bool {
        if self.codec.decode_unverified(token).is_none() {
            warn!("unparseable token string treated as blacklisted");
            return true;
        }
        match self.store.is_token_blacklisted(token).await {
            Ok(blacklisted) => blacklisted,
            Err(e) => {
                error!(error = %e, "token blacklist check failed - assuming blacklisted");
                true
            }
        }
    }

    /// Whether the family is blacklisted. Fail-closed on store errors.
    pub async fn is_family_blacklisted(&self, family: &str) -> bool {
        match self.store.is_family_blacklisted(family).await {
            Ok(blacklisted) => blacklisted,
            Err(e) => {
                error!(error = %e, family, "family blacklist check failed - assuming blacklisted");
                true
            }
        }
    }

    /// Last accepted generation for a family; `None` when unrecorded or on
    /// store error (the gate's generation check then fails for any gen > 0,
    /// and the blacklist checks above already deny an outage outright).
    pub async fn last_generation(&self, family: &str) -> Option<u32> {
        match self.store.last_generation(family).await {
            Ok(gen) => gen,
            Err(e) => {
                error!(error = %e, family, "last generation lookup failed");
                None
            }
        }
    }

    /// Whether the payload predates its user's logout-all epoch. Fail-closed
    /// on store errors.
    pub async fn issued_before_logout_all(&self, claims: &TokenClaims) -> bool {
        match self
            .store
            .is_issued_before_logout_all(claims, claims.user_id)
            .await
        {
            Ok(before) => before,
            Err(e) => {
                error!(error = %e, "logout-all epoch check failed - assuming logged out");
                true
            }
        }
    }

    /// Persist the latest accepted generation after a successful rotation.
    ///
    /// Plain overwrite; see [`RevocationStore::set_last_generation`] for the
    /// accepted concurrent-rotation race.
    pub async fn record_generation(&self, family: &str, generation: u32) {
        if let Err(e) = self.store.set_last_generation(family, generation).await {
            error!(error = %e, family, generation, "failed to record token generation");
        }
    }

    /// Blacklist a single token string
    pub async fn blacklist_token(&self, token: &str) {
        if self.codec.decode_unverified(token).is_none() {
            warn!("refusing to blacklist unparseable token string");
            return;
        }
        if let Err(e) = self.store.blacklist_token(token).await {
            error!(error = %e, "failed to blacklist token");
        }
    }

    /// Blacklist a whole token family (single-device logout, or defensive
    /// burn on tamper/stale-generation reuse)
    pub async fn logout_family(&self, family: &str) {
        if let Err(e) = self.store.blacklist_family(family).await {
            error!(error = %e, family, "failed to blacklist token family");
        }
    }

    /// Invalidate every token issued to the user before now
    pub async fn logout_all_devices(&self, user_id: i64) {
        if let Err(e) = self.store.record_logout_all(user_id).await {
            error!(error = %e, user_id, "failed to record logout-all epoch");
        }
    }
}
