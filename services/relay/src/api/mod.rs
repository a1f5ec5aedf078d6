//! HTTP API surface of the relay.
//!
//! Module boundaries mirror the endpoints: payload shapes in `types`,
//! error construction in `error`, handlers in `messages`.
pub mod error;
pub mod messages;
pub mod types;
