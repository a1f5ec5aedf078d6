//! Message endpoints: submit plus the two polling modes.
//!
//! # Purpose and responsibility
//! Thin HTTP glue over `RelayService`: extract, delegate, serialize. All
//! delivery semantics live in the service layer.
//!
//! # Key invariants and assumptions
//! - `/short-polling` never blocks; `/long-polling` may be held open up to
//!   the configured timeout.
//! - Response shapes are fixed by the existing clients (see `api::types`).
use crate::api::error::ApiError;
use crate::api::types::{SendRequest, SendResponse, ShortPollingParams};
use crate::app::AppState;
use crate::service::MessageRecord;
use axum::Json;
use axum::extract::{Query, State};

/// Accept a new message and release every pending long-poll.
///
/// # Errors
/// - 400 `{ "error": "Message is required." }` when the message is missing,
///   empty, or whitespace-only. A missing or non-JSON body counts as a
///   missing message rather than a malformed request.
pub(crate) async fn send_message(
    State(state): State<AppState>,
    payload: Option<Json<SendRequest>>,
) -> Result<Json<SendResponse>, ApiError> {
    let content = payload
        .and_then(|Json(request)| request.message)
        .unwrap_or_default();
    state.relay.submit(&content).await?;
    Ok(Json(SendResponse {
        success: true,
        message: "Message sent successfully.".to_string(),
    }))
}

/// Immediate reply with every message newer than `since` (default 0).
pub(crate) async fn short_polling(
    State(state): State<AppState>,
    Query(params): Query<ShortPollingParams>,
) -> Json<Vec<MessageRecord>> {
    let since = params
        .since
        .as_deref()
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or(0);
    Json(state.relay.fetch_since(since).await)
}

/// Entire log immediately if non-empty; otherwise held open until a message
/// arrives or the configured timeout elapses (then `[]`).
pub(crate) async fn long_polling(State(state): State<AppState>) -> Json<Vec<MessageRecord>> {
    Json(state.relay.long_poll_fetch(state.long_poll_timeout).await)
}
