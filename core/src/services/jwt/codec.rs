//! Signing, verification and optimistic decoding of token strings.

use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::domain::entities::token::TokenClaims;
use crate::errors::TokenError;

/// Stateless codec for signed, time-limited tokens.
///
/// `decode_unverified` is deliberately offered next to `verify`: request
/// handling attaches claims early for logging and convenience, while the
/// security gate still performs the full check before granting access.
/// Output of `decode_unverified` is never authorization evidence.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    verification: Validation,
}

impl TokenCodec {
    /// Create a codec signing with the given shared secret
    pub fn new(secret: &str) -> Self {
        let mut verification = Validation::new(Algorithm::HS256);
        verification.validate_exp = true;
        verification.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            verification,
        }
    }

    /// Sign claims stamped with `iat = now`, `exp = now + ttl_secs`
    pub fn encode(
        &self,
        user_id: i64,
        fam: &str,
        gen: u32,
        ttl_secs: i64,
    ) -> Result<String, TokenError> {
        let claims = TokenClaims::issue_now(user_id, fam, gen, ttl_secs);
        self.encode_claims(&claims)
    }

    /// Sign claims exactly as given.
    ///
    /// Rotation uses this to preserve a refresh token's original `iat` and
    /// `exp` while stamping the incremented generation.
    pub fn encode_claims(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed)
    }

    /// Parse claims without verifying the signature or the TTL.
    ///
    /// Returns `None` on malformed input. Lower-trust by design: callers use
    /// this for claim extraction only.
    pub fn decode_unverified(&self, token: &str) -> Option<TokenClaims> {
        let mut insecure = Validation::new(Algorithm::HS256);
        insecure.insecure_disable_signature_validation();
        insecure.validate_exp = false;
        insecure.required_spec_claims.clear();

        decode::<TokenClaims>(token, &self.decoding_key, &insecure)
            .ok()
            .map(|data| data.claims)
    }

    /// Full cryptographic and TTL check
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.verification)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::Utf8(_) => TokenError::MalformedToken,
                _ => TokenError::InvalidSignature,
            })
    }
}
