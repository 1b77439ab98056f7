//! Configuration for the JWT service

/// Configuration for the JWT service
#[derive(Debug, Clone)]
pub struct JwtServiceConfig {
    /// Shared HS256 signing secret
    pub secret: String,
    /// Access token TTL in seconds
    pub access_ttl_secs: i64,
    /// Refresh token TTL in seconds
    pub refresh_ttl_secs: i64,
}

impl Default for JwtServiceConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-please-change-in-production-0123456789abcdef".to_string(),
            access_ttl_secs: 900,      // 15 minutes
            refresh_ttl_secs: 604_800, // 7 days
        }
    }
}
