//! Token-specific error definitions.
//!
//! These cover the codec's failure modes. Request-denial outcomes are a
//! separate concern: the security gate reports them as `DenyReason` values,
//! and every one of them collapses to the same generic unauthorized response
//! at the API boundary. The check that actually fired is logged for
//! diagnosis, never returned to the client.

use thiserror::Error;

/// Token encoding and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token string failed to parse")]
    MalformedToken,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}
