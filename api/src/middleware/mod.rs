//! Request middleware for the Stockbase API

pub mod claims;
pub mod cors;
pub mod gate;

pub use claims::{AccessTokenPayload, AuthenticatedUser, ExtractJwts, RefreshTokenPayload};
pub use gate::JwtGate;
