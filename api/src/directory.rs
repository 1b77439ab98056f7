//! Seed-backed user directory.
//!
//! The relational user model lives in another service; this directory stands
//! in for it so the binary can run end-to-end. Accounts come from the
//! `SEED_USERS` environment variable as comma-separated `email:password:id`
//! triples, mirroring the platform's database seeding. Not for production
//! traffic.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::warn;

use sb_core::errors::DomainError;
use sb_core::repositories::{UserAccount, UserDirectory};

/// User directory seeded from the environment
pub struct SeedUserDirectory {
    accounts: HashMap<String, (String, i64)>,
}

impl SeedUserDirectory {
    /// Parse `SEED_USERS` (`email:password:id,...`)
    pub fn from_env() -> Self {
        let raw = std::env::var("SEED_USERS").unwrap_or_default();
        Self::parse(&raw)
    }

    /// Parse a seed string of comma-separated `email:password:id` triples
    pub fn parse(raw: &str) -> Self {
        let mut accounts = HashMap::new();
        for entry in raw.split(',').filter(|e| !e.trim().is_empty()) {
            let mut parts = entry.trim().splitn(3, ':');
            match (parts.next(), parts.next(), parts.next().and_then(|id| id.parse().ok())) {
                (Some(email), Some(password), Some(id)) => {
                    accounts.insert(email.to_string(), (password.to_string(), id));
                }
                _ => warn!(entry, "ignoring malformed SEED_USERS entry"),
            }
        }
        Self { accounts }
    }

    /// Number of seeded accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no accounts were seeded
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl UserDirectory for SeedUserDirectory {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.accounts.get(email).and_then(|(stored, id)| {
            (stored == password).then(|| UserAccount {
                id: *id,
                email: email.to_string(),
            })
        }))
    }
}
