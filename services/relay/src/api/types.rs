//! HTTP API request/response types.
//!
//! # Purpose
//! Defines the payload shapes of the relay's wire contract. The shapes are
//! fixed by the existing polling clients and must not change:
//! message arrays are `[{ "message": ..., "timestamp": ... }]`, send
//! failures are `{ "error": ... }`.
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SendRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SendResponse {
    pub success: bool,
    pub message: String,
}

/// Error body in the shape the polling clients expect.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query parameters for `GET /short-polling`.
///
/// `since` is kept as a raw string: an absent or unparsable value falls
/// back to 0 (the entire log) instead of rejecting the request.
#[derive(Debug, Deserialize, Default)]
pub struct ShortPollingParams {
    pub since: Option<String>,
}
