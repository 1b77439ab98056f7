//! API error type and response mapping.
//!
//! Every authorization failure collapses to one generic unauthorized body so
//! the response never acts as a revocation-state oracle. The single
//! exception is the logout-all case, which carries a distinct message the
//! client may surface. The check that actually failed is logged where it
//! fired, not here.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::dto::ErrorResponse;

/// Errors surfaced by the api layer
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("You were logged out from all devices.")]
    LoggedOutAllDevices,

    #[error("Email or password is incorrect")]
    InvalidCredentials,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error")]
    Internal,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized
            | ApiError::LoggedOutAllDevices
            | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Unauthorized => ErrorResponse::unauthorized(),
            ApiError::LoggedOutAllDevices => {
                ErrorResponse::new("logged_out_all_devices", self.to_string())
            }
            ApiError::InvalidCredentials => ErrorResponse::new("unauthorized", self.to_string()),
            ApiError::BadRequest(message) => ErrorResponse::new("bad_request", message.clone()),
            ApiError::Internal => {
                ErrorResponse::new("internal_error", "An internal error occurred")
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_failures_share_a_401() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::LoggedOutAllDevices.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }
}
