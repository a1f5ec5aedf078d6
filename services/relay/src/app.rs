//! Relay HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and
//! testable; integration tests build the same router against an ephemeral
//! listener.
use crate::api;
use crate::service::RelayService;
use axum::Router;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub relay: RelayService,
    pub long_poll_timeout: Duration,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/send", axum::routing::post(api::messages::send_message))
        .route(
            "/short-polling",
            axum::routing::get(api::messages::short_polling),
        )
        .route(
            "/long-polling",
            axum::routing::get(api::messages::long_polling),
        )
        // The polling frontend is served from a different origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
