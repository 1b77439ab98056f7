//! # Stockbase Shared
//!
//! Cross-cutting configuration and value types shared by every layer of the
//! Stockbase backend. This crate has no business logic of its own.

pub mod config;
pub mod types;
