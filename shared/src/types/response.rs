//! Standard API response envelopes

use serde::{Deserialize, Serialize};

/// Error payload returned by the API.
///
/// Authorization failures intentionally share one generic body; the specific
/// check that failed is logged server-side only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,

    /// Human-readable message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }

    /// Generic unauthorized response used for every authorization failure
    pub fn unauthorized() -> Self {
        Self::new("unauthorized", "Unauthorized")
    }
}
