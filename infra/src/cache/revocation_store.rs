//! Redis-backed revocation store.
//!
//! Maps the core revocation interface onto four key partitions:
//! - hash `tokenBlacklist`: token string -> "1"
//! - hash `tokenFamilyBlacklist`: family id -> "1"
//! - hash `familyGenerations`: family id -> last accepted generation
//! - string `logoutAllTokensIssuedBeforeTimestamp:{userId}`: epoch seconds
//!
//! Every operation is a single-key command, so each is individually atomic
//! under Redis's per-key ordering; no transactions are used.

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use sb_core::errors::DomainError;
use sb_core::repositories::RevocationStore;

use crate::InfrastructureError;

use super::redis_client::RedisClient;

const TOKEN_BLACKLIST: &str = "tokenBlacklist";
const FAMILY_BLACKLIST: &str = "tokenFamilyBlacklist";
const FAMILY_GENERATIONS: &str = "familyGenerations";
const LOGOUT_ALL_PREFIX: &str = "logoutAllTokensIssuedBeforeTimestamp";

/// Revocation store over Redis
#[derive(Clone)]
pub struct RedisRevocationStore {
    client: RedisClient,
}

impl RedisRevocationStore {
    /// Create a store over an existing Redis client
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn logout_all_key(user_id: i64) -> String {
        format!("{LOGOUT_ALL_PREFIX}:{user_id}")
    }
}

/// Every store error surfaces as `StoreUnavailable`; the core's JWT service
/// turns that into the deny-biased answer.
fn store_error(e: InfrastructureError) -> DomainError {
    DomainError::StoreUnavailable {
        message: e.to_string(),
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn is_token_blacklisted(&self, token: &str) -> Result<bool, DomainError> {
        self.client
            .hash_field_exists(TOKEN_BLACKLIST, token)
            .await
            .map_err(store_error)
    }

    async fn is_family_blacklisted(&self, family: &str) -> Result<bool, DomainError> {
        self.client
            .hash_field_exists(FAMILY_BLACKLIST, family)
            .await
            .map_err(store_error)
    }

    async fn blacklist_token(&self, token: &str) -> Result<(), DomainError> {
        debug!("blacklisting token");
        self.client
            .hash_set(TOKEN_BLACKLIST, token, "1")
            .await
            .map_err(store_error)
    }

    async fn blacklist_family(&self, family: &str) -> Result<(), DomainError> {
        debug!(family, "blacklisting token family");
        self.client
            .hash_set(FAMILY_BLACKLIST, family, "1")
            .await
            .map_err(store_error)
    }

    async fn last_generation(&self, family: &str) -> Result<Option<u32>, DomainError> {
        let raw = self
            .client
            .hash_get(FAMILY_GENERATIONS, family)
            .await
            .map_err(store_error)?;

        match raw {
            None => Ok(None),
            Some(value) => value.parse::<u32>().map(Some).map_err(|_| {
                store_error(InfrastructureError::MalformedValue {
                    key: format!("{FAMILY_GENERATIONS}/{family}"),
                    value,
                })
            }),
        }
    }

    async fn set_last_generation(&self, family: &str, generation: u32) -> Result<(), DomainError> {
        self.client
            .hash_set(FAMILY_GENERATIONS, family, &generation.to_string())
            .await
            .map_err(store_error)
    }

    async fn record_logout_all(&self, user_id: i64) -> Result<(), DomainError> {
        let now = Utc::now().timestamp();
        self.client
            .set(&Self::logout_all_key(user_id), &now.to_string())
            .await
            .map_err(store_error)
    }

    async fn logout_epoch(&self, user_id: i64) -> Result<Option<i64>, DomainError> {
        let raw = self
            .client
            .get(&Self::logout_all_key(user_id))
            .await
            .map_err(store_error)?;

        match raw {
            None => Ok(None),
            Some(value) => value.parse::<i64>().map(Some).map_err(|_| {
                store_error(InfrastructureError::MalformedValue {
                    key: Self::logout_all_key(user_id),
                    value,
                })
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::domain::entities::token::TokenClaims;
    use sb_shared::config::CacheConfig;

    #[test]
    fn test_logout_all_key_shape() {
        assert_eq!(
            RedisRevocationStore::logout_all_key(42),
            "logoutAllTokensIssuedBeforeTimestamp:42"
        );
    }

    #[test]
    fn test_store_error_maps_to_unavailable() {
        let err = store_error(InfrastructureError::Config("bad url".to_string()));
        assert!(matches!(err, DomainError::StoreUnavailable { .. }));
    }

    async fn connect() -> Option<RedisClient> {
        let url = std::env::var("TEST_REDIS_URL").ok()?;
        RedisClient::new(CacheConfig::new(url).with_prefix("sb_test"))
            .await
            .ok()
    }

    // Integration tests below need a live Redis; they run only when
    // TEST_REDIS_URL is set (e.g. in CI with a redis service container).

    #[tokio::test]
    #[ignore = "requires a running Redis instance (set TEST_REDIS_URL)"]
    async fn test_token_blacklist_round_trip_against_redis() {
        let Some(client) = connect().await else { return };
        let store = RedisRevocationStore::new(client);

        let token = format!("it-token-{}", Utc::now().timestamp_micros());
        assert!(!store.is_token_blacklisted(&token).await.unwrap());
        store.blacklist_token(&token).await.unwrap();
        assert!(store.is_token_blacklisted(&token).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis instance (set TEST_REDIS_URL)"]
    async fn test_generation_and_logout_round_trip_against_redis() {
        let Some(client) = connect().await else { return };
        let store = RedisRevocationStore::new(client);

        let family = format!("it-fam-{}", Utc::now().timestamp_micros());
        assert_eq!(store.last_generation(&family).await.unwrap(), None);
        store.set_last_generation(&family, 3).await.unwrap();
        assert_eq!(store.last_generation(&family).await.unwrap(), Some(3));

        let user_id = Utc::now().timestamp_micros();
        let mut claims = TokenClaims::issue_now(user_id, &family, 3, 900);
        claims.iat -= 60;
        store.record_logout_all(user_id).await.unwrap();
        assert!(store
            .is_issued_before_logout_all(&claims, user_id)
            .await
            .unwrap());
    }
}
