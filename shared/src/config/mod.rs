//! Configuration modules for the Stockbase backend.
//!
//! Each submodule owns one configuration concern and provides a `from_env()`
//! constructor so the api binary can assemble its full configuration from
//! environment variables.

pub mod auth;
pub mod cache;
pub mod environment;
pub mod server;

pub use auth::{AuthConfig, CookieConfig, JwtConfig};
pub use cache::CacheConfig;
pub use environment::Environment;
pub use server::ServerConfig;
