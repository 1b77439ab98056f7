//! # Stockbase Core
//!
//! Core domain layer for the Stockbase backend. This crate contains the
//! credential payload entities, the revocation store interface, the JWT
//! service (codec and token lifecycle) and the security gate that decides
//! whether a presented credential may pass.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

pub use domain::entities::token::{CreationClaims, TokenClaims, TokenPair};
pub use errors::{DomainError, DomainResult, TokenError};
pub use repositories::{InMemoryRevocationStore, RevocationStore, UserDirectory};
pub use services::jwt::{
    DenyReason, GateDecision, JwtService, JwtServiceConfig, SecurityGate, TokenCodec, TokenFlavor,
};
