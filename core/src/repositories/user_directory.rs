//! User directory collaborator interface.
//!
//! Credential verification (user lookup plus password check) lives behind
//! this trait; the hashing scheme and the user data model are external
//! concerns the auth core never sees.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Minimal account projection returned on a successful credential check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// User identifier
    pub id: i64,

    /// Account email
    pub email: String,
}

/// Credential-check collaborator
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Verify an email/password pair.
    ///
    /// Returns `Ok(None)` when the account does not exist or the password is
    /// wrong; the two cases are indistinguishable to the caller.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, DomainError>;
}
