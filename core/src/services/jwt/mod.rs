//! JWT session module.
//!
//! This module owns the whole token protocol:
//! - signing and verifying token strings (codec)
//! - issuing and rotating access/refresh token pairs (service)
//! - the per-request allow/deny decision for protected endpoints (gate)

mod codec;
mod config;
mod gate;
mod service;

#[cfg(test)]
mod tests;

pub use codec::TokenCodec;
pub use config::JwtServiceConfig;
pub use gate::{DenyReason, GateDecision, SecurityGate, TokenFlavor};
pub use service::JwtService;
