//! # Infrastructure Layer
//!
//! Concrete implementations of the core's external collaborator interfaces.
//! Today that is the Redis-backed revocation store and the Redis client it
//! rides on.

use thiserror::Error;

/// Cache module - Redis client and the revocation store implementation
pub mod cache;

/// Infrastructure-level errors
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed stored value for key '{key}': {value}")]
    MalformedValue { key: String, value: String },
}
