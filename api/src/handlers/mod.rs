//! Request handler support

pub mod error;

pub use error::ApiError;
