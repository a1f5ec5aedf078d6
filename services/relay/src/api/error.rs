//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every endpoint returns
//! the same `{ "error": ... }` body shape the polling clients already
//! parse.
//!
//! # Key invariants and assumptions
//! - Validation failures map to 400 with the exact message the clients
//!   match on.
//! - Anything unexpected maps to 500 with a generic message; details are
//!   logged server-side and the process keeps serving.
use crate::api::types::ErrorResponse;
use crate::service::RelayError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// Couples an HTTP status code with the wire-compatible JSON error body and
/// implements `IntoResponse` so handlers can return `Result<_, ApiError>`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Build a 400 Bad Request validation error.
pub fn api_validation_error(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorResponse {
            error: message.to_string(),
        },
    }
}

/// Build a 500 Internal Server Error with a generic message.
pub fn api_internal(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: ErrorResponse {
            error: message.to_string(),
        },
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            // The exact message is part of the wire contract.
            RelayError::EmptyMessage => api_validation_error("Message is required."),
        }
    }
}
