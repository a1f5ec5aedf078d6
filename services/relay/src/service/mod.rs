//! Core relay service: message log plus long-poll waiter coordination.
//!
//! # Purpose
//! `RelayService` owns the process-wide relay state and exposes the three
//! operations the HTTP layer delegates to: `submit`, `fetch_since`, and
//! `long_poll_fetch`. It is created once at startup and cloned into request
//! handlers; there are no ambient globals.
//!
//! # Concurrency
//! One `tokio::sync::Mutex` guards the log and the waiter table together.
//! This is the only mutual-exclusion-sensitive section in the relay:
//! - `submit` appends and releases all waiters under a single lock
//!   acquisition, so a successful submit implies the release already ran.
//! - `long_poll_fetch` checks the log and registers its waiter under the
//!   same lock, so an arriving message can never slip between the check and
//!   the registration.
//! The await on the oneshot receiver happens outside the lock; no lock is
//! held across a suspension point.
pub mod log;
pub mod waiters;

pub use log::{MessageLog, MessageRecord};
pub use waiters::WaiterTable;

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("message is required")]
    EmptyMessage,
}

#[derive(Debug, Default)]
struct RelayState {
    log: MessageLog,
    waiters: WaiterTable,
}

/// Shared relay state handle, cheap to clone into request handlers.
#[derive(Debug, Clone, Default)]
pub struct RelayService {
    state: Arc<Mutex<RelayState>>,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

impl RelayService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a message: append it to the log, then resolve every pending
    /// long-poll waiter with just the new record.
    ///
    /// # Errors
    /// - `RelayError::EmptyMessage` for empty or whitespace-only content;
    ///   the log and the waiter table are left untouched.
    pub async fn submit(&self, content: &str) -> Result<MessageRecord, RelayError> {
        let (record, released) = {
            let mut state = self.state.lock().await;
            let record = state.log.append(content, now_ms())?;
            // The release delivers only the new record, while the long-poll
            // immediate path below returns the whole log. Both behaviors are
            // part of the wire contract.
            let released = state.waiters.release_all(std::slice::from_ref(&record));
            (record, released)
        };
        metrics::counter!("relay_messages_total").increment(1);
        if released > 0 {
            metrics::counter!("relay_waiters_released_total").increment(released as u64);
        }
        tracing::info!(timestamp = record.timestamp, released, "message accepted");
        Ok(record)
    }

    /// All messages with `timestamp > cutoff`, in arrival order.
    pub async fn fetch_since(&self, cutoff: u64) -> Vec<MessageRecord> {
        self.state.lock().await.log.since(cutoff)
    }

    /// Long-poll for messages: reply immediately with the entire log when it
    /// is non-empty, otherwise block until a message arrives or `timeout`
    /// elapses (then `[]`).
    pub async fn long_poll_fetch(&self, timeout: Duration) -> Vec<MessageRecord> {
        let (id, mut rx) = {
            let mut state = self.state.lock().await;
            if !state.log.is_empty() {
                return state.log.all();
            }
            tracing::debug!(pending = state.waiters.len() + 1, "long-poll waiter registered");
            state.waiters.register()
        };

        match tokio::time::timeout(timeout, &mut rx).await {
            Ok(Ok(messages)) => messages,
            // The sender was dropped without resolving; treat as an empty
            // poll rather than an error.
            Ok(Err(_)) => Vec::new(),
            Err(_) => {
                let removed = {
                    let mut state = self.state.lock().await;
                    state.waiters.remove(id)
                };
                if removed {
                    metrics::counter!("relay_long_poll_timeouts_total").increment(1);
                    return Vec::new();
                }
                // A release drained this waiter between the deadline firing
                // and the lock being reacquired. The release resolves the
                // channel before dropping the lock, so the messages are
                // already there.
                rx.try_recv().unwrap_or_default()
            }
        }
    }

    /// Number of messages currently in the log.
    pub async fn log_len(&self) -> usize {
        self.state.lock().await.log.len()
    }

    /// Number of long-poll waiters currently pending.
    pub async fn pending_waiters(&self) -> usize {
        self.state.lock().await.waiters.len()
    }
}
