//! Token entities for JWT-based session management.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Payload supplied at login time, before family and generation are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationClaims {
    /// User identifier
    #[serde(rename = "userId")]
    pub user_id: i64,
}

/// Claims carried by both token flavors.
///
/// Access and refresh tokens share this shape; they differ only in TTL and in
/// which operations accept them. `fam` groups every token descended from one
/// login; `gen` increments on each rotation within that family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User identifier
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Token family identifier
    pub fam: String,

    /// Rotation generation within the family
    pub gen: u32,

    /// Issued-at timestamp (epoch seconds)
    pub iat: i64,

    /// Expiration timestamp (epoch seconds)
    pub exp: i64,
}

impl TokenClaims {
    /// Build claims stamped with a fresh `iat` of now and the given TTL.
    pub fn issue_now(user_id: i64, fam: impl Into<String>, gen: u32, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            user_id,
            fam: fam.into(),
            gen,
            iat: now,
            exp: now + ttl_secs,
        }
    }

    /// Whether the claims have passed their expiration timestamp
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Whether the token was issued strictly before the given epoch
    pub fn issued_before(&self, epoch_secs: i64) -> bool {
        self.iat < epoch_secs
    }
}

/// An access/refresh token pair issued together.
///
/// Both halves are derived from the same `(user_id, fam, gen)` triple but are
/// independently signed and independently expiring. The pair is transient:
/// the core signs and verifies tokens, it never persists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub token: String,

    /// Signed refresh token
    pub refresh_token: String,

    /// Access token absolute expiry (epoch seconds), for cookie attributes
    pub token_expires_at: i64,

    /// Refresh token absolute expiry (epoch seconds), for cookie attributes
    pub refresh_expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_now_stamps_ttl() {
        let claims = TokenClaims::issue_now(7, "fam-1", 0, 900);
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.fam, "fam-1");
        assert_eq!(claims.gen, 0);
        assert_eq!(claims.exp - claims.iat, 900);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_expired_claims() {
        let mut claims = TokenClaims::issue_now(7, "fam-1", 0, 900);
        claims.exp = Utc::now().timestamp() - 1;
        assert!(claims.is_expired());
    }

    #[test]
    fn test_issued_before() {
        let claims = TokenClaims::issue_now(7, "fam-1", 0, 900);
        assert!(claims.issued_before(claims.iat + 1));
        assert!(!claims.issued_before(claims.iat));
    }

    #[test]
    fn test_claims_wire_format_uses_user_id_alias() {
        let claims = TokenClaims::issue_now(42, "fam-2", 3, 64);
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"userId\":42"));
        assert!(json.contains("\"fam\":\"fam-2\""));
        assert!(json.contains("\"gen\":3"));

        let back: TokenClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(back, claims);
    }
}
