//! API configuration assembled from environment variables.

use serde::{Deserialize, Serialize};

use sb_shared::config::{auth::AuthConfigError, AuthConfig, CacheConfig, Environment, ServerConfig};

/// Full configuration for the api binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub auth: AuthConfig,
    pub cache: CacheConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl ApiConfig {
    /// Assemble from environment variables (after `dotenvy` has run)
    pub fn from_env() -> Self {
        Self {
            auth: AuthConfig::from_env(),
            cache: CacheConfig::from_env(),
            server: ServerConfig::from_env(),
            environment: Environment::from_env(),
        }
    }

    /// Enforce configuration invariants (secret length, TTL floors)
    pub fn validate(&self) -> Result<(), AuthConfigError> {
        self.auth.validate()
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }

    pub fn redis_url(&self) -> &str {
        &self.cache.url
    }

    pub fn bind_address(&self) -> String {
        self.server.bind_address()
    }
}
