//! Relay service library crate.
//!
//! # Purpose
//! Exposes the relay's HTTP surface, configuration, observability wiring,
//! and the core message-log/waiter machinery for use by the binary and
//! integration tests.
//!
//! # Notes
//! Module boundaries mirror the HTTP API (`api`, `app`) and the delivery
//! core (`service`).
pub mod api;
pub mod app;
pub mod config;
pub mod observability;
pub mod service;
