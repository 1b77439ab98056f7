//! Authentication configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of characters required in the JWT signing secret.
pub const MIN_SECRET_LEN: usize = 64;

/// Minimum token TTL in seconds (applies to both token flavors).
pub const MIN_TTL_SECS: i64 = 64;

/// Errors raised while validating authentication configuration
#[derive(Error, Debug)]
pub enum AuthConfigError {
    #[error("JWT secret must be at least {MIN_SECRET_LEN} characters, got {0}")]
    SecretTooShort(usize),

    #[error("{0} TTL must be at least {MIN_TTL_SECS} seconds, got {1}")]
    TtlTooShort(&'static str, i64),
}

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret for HS256 signing
    pub secret: String,

    /// Access token TTL in seconds
    pub access_ttl_secs: i64,

    /// Refresh token TTL in seconds
    pub refresh_ttl_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_ttl_secs: 900,      // 15 minutes
            refresh_ttl_secs: 604_800, // 7 days
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set the access token TTL in seconds
    pub fn with_access_ttl_secs(mut self, secs: i64) -> Self {
        self.access_ttl_secs = secs;
        self
    }

    /// Set the refresh token TTL in seconds
    pub fn with_refresh_ttl_secs(mut self, secs: i64) -> Self {
        self.refresh_ttl_secs = secs;
        self
    }

    /// Enforce the minimum secret entropy and TTL floors
    pub fn validate(&self) -> Result<(), AuthConfigError> {
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(AuthConfigError::SecretTooShort(self.secret.len()));
        }
        if self.access_ttl_secs < MIN_TTL_SECS {
            return Err(AuthConfigError::TtlTooShort("access token", self.access_ttl_secs));
        }
        if self.refresh_ttl_secs < MIN_TTL_SECS {
            return Err(AuthConfigError::TtlTooShort("refresh token", self.refresh_ttl_secs));
        }
        Ok(())
    }
}

/// Token cookie configuration.
///
/// Flag policy (http-only, secure, domain scoping) is transport-layer
/// configuration; the auth core only produces token strings and expiries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CookieConfig {
    /// Cookie name carrying the access token
    pub access_name: String,

    /// Cookie name carrying the refresh token
    pub refresh_name: String,

    /// Domain scope for both cookies
    pub domain: String,

    /// Secure flag (HTTPS only)
    pub secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            access_name: String::from("token"),
            refresh_name: String::from("refreshToken"),
            domain: String::from("localhost"),
            secure: true,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Token cookie configuration
    #[serde(default)]
    pub cookies: CookieConfig,
}

impl AuthConfig {
    /// Create from environment variables.
    ///
    /// Reads `JWT_SECRET`, `JWT_TTL_SECS`, `REFRESH_JWT_TTL_SECS`,
    /// `JWT_COOKIE_NAME`, `REFRESH_JWT_COOKIE_NAME`, `JWT_COOKIE_DOMAIN`
    /// and `JWT_COOKIE_SECURE`.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        let access_ttl_secs = std::env::var("JWT_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(900);
        let refresh_ttl_secs = std::env::var("REFRESH_JWT_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(604_800);

        let defaults = CookieConfig::default();
        let cookies = CookieConfig {
            access_name: std::env::var("JWT_COOKIE_NAME").unwrap_or(defaults.access_name),
            refresh_name: std::env::var("REFRESH_JWT_COOKIE_NAME").unwrap_or(defaults.refresh_name),
            domain: std::env::var("JWT_COOKIE_DOMAIN").unwrap_or(defaults.domain),
            secure: std::env::var("JWT_COOKIE_SECURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.secure),
        };

        Self {
            jwt: JwtConfig {
                secret,
                access_ttl_secs,
                refresh_ttl_secs,
            },
            cookies,
        }
    }

    /// Enforce the configuration invariants
    pub fn validate(&self) -> Result<(), AuthConfigError> {
        self.jwt.validate()
    }
}
