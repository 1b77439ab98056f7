//! Revocation store trait defining the shared session-revocation state.
//!
//! The store is the only shared mutable resource of the auth core. It keeps
//! four logical partitions: blacklisted token strings, blacklisted token
//! families, the last accepted generation per family, and a per-user
//! "logged out before" epoch. Every operation is a single-key read or write;
//! no multi-key transactions are required, and no deletion API exists (entry
//! expiry is the backing store's concern).
//!
//! # Failure policy
//! Implementations report errors faithfully. The deny-biased fail-closed
//! mapping (store error ⇒ treat as revoked) is applied by [`JwtService`],
//! which is the only caller that asks yes/no revocation questions.
//!
//! [`JwtService`]: crate::services::jwt::JwtService

use async_trait::async_trait;

use crate::domain::entities::token::TokenClaims;
use crate::errors::DomainError;

/// Shared revocation state reachable from every request-handling task.
///
/// All operations are idempotent: blacklisting twice, or re-recording the
/// same generation, is harmless.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Whether this exact token string has been blacklisted
    async fn is_token_blacklisted(&self, token: &str) -> Result<bool, DomainError>;

    /// Whether the whole token family has been blacklisted
    async fn is_family_blacklisted(&self, family: &str) -> Result<bool, DomainError>;

    /// Blacklist a single token string (e.g. on logout)
    async fn blacklist_token(&self, token: &str) -> Result<(), DomainError>;

    /// Blacklist a token family (e.g. on detected stale-generation reuse)
    async fn blacklist_family(&self, family: &str) -> Result<(), DomainError>;

    /// Last accepted generation for a family; `None` if never recorded
    async fn last_generation(&self, family: &str) -> Result<Option<u32>, DomainError>;

    /// Record the latest accepted generation for a family.
    ///
    /// Plain overwrite, not a compare-and-swap: two concurrent rotations of
    /// the same token can both pass the generation check before either write
    /// lands. Accepted race; a conditional write is the documented stricter
    /// alternative.
    async fn set_last_generation(&self, family: &str, generation: u32) -> Result<(), DomainError>;

    /// Record "now" as the user's logout-all epoch; earlier-issued tokens
    /// become invalid
    async fn record_logout_all(&self, user_id: i64) -> Result<(), DomainError>;

    /// The user's logout-all epoch, if one was ever recorded
    async fn logout_epoch(&self, user_id: i64) -> Result<Option<i64>, DomainError>;

    /// Whether the payload was issued before the user's logout-all epoch
    async fn is_issued_before_logout_all(
        &self,
        payload: &TokenClaims,
        user_id: i64,
    ) -> Result<bool, DomainError> {
        match self.logout_epoch(user_id).await? {
            Some(epoch) => Ok(payload.issued_before(epoch)),
            None => Ok(false),
        }
    }
}

/// In-memory revocation store.
///
/// Backs tests and store-less local runs. An injectable failure flag lets
/// tests exercise the fail-closed paths without a real outage.
#[derive(Default)]
pub struct InMemoryRevocationStore {
    inner: tokio::sync::RwLock<Partitions>,
    fail: std::sync::atomic::AtomicBool,
}

#[derive(Default)]
struct Partitions {
    token_blacklist: std::collections::HashSet<String>,
    family_blacklist: std::collections::HashSet<String>,
    family_generations: std::collections::HashMap<String, u32>,
    logout_epochs: std::collections::HashMap<i64, i64>,
}

impl InMemoryRevocationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail, simulating a store outage
    pub fn set_failing(&self, failing: bool) {
        self.fail
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable {
                message: "simulated outage".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn is_token_blacklisted(&self, token: &str) -> Result<bool, DomainError> {
        self.check_available()?;
        Ok(self.inner.read().await.token_blacklist.contains(token))
    }

    async fn is_family_blacklisted(&self, family: &str) -> Result<bool, DomainError> {
        self.check_available()?;
        Ok(self.inner.read().await.family_blacklist.contains(family))
    }

    async fn blacklist_token(&self, token: &str) -> Result<(), DomainError> {
        self.check_available()?;
        self.inner
            .write()
            .await
            .token_blacklist
            .insert(token.to_string());
        Ok(())
    }

    async fn blacklist_family(&self, family: &str) -> Result<(), DomainError> {
        self.check_available()?;
        self.inner
            .write()
            .await
            .family_blacklist
            .insert(family.to_string());
        Ok(())
    }

    async fn last_generation(&self, family: &str) -> Result<Option<u32>, DomainError> {
        self.check_available()?;
        Ok(self.inner.read().await.family_generations.get(family).copied())
    }

    async fn set_last_generation(&self, family: &str, generation: u32) -> Result<(), DomainError> {
        self.check_available()?;
        self.inner
            .write()
            .await
            .family_generations
            .insert(family.to_string(), generation);
        Ok(())
    }

    async fn record_logout_all(&self, user_id: i64) -> Result<(), DomainError> {
        self.check_available()?;
        let now = chrono::Utc::now().timestamp();
        self.inner.write().await.logout_epochs.insert(user_id, now);
        Ok(())
    }

    async fn logout_epoch(&self, user_id: i64) -> Result<Option<i64>, DomainError> {
        self.check_available()?;
        Ok(self.inner.read().await.logout_epochs.get(&user_id).copied())
    }
}
