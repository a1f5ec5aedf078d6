//! Table of pending long-poll waiters.
//!
//! # Purpose
//! Tracks every long-poll request currently blocked waiting for a message.
//! Each waiter holds the send half of a oneshot channel; the request handler
//! awaits the receive half. A waiter is resolved exactly once: removal from
//! this table and resolution are the same action, performed by whichever
//! path (message arrival or deadline expiry) gets there first.
//!
//! # Concurrency
//! The table itself is not synchronized; `RelayService` guards it together
//! with the message log under one lock so that check-log-then-register can
//! never interleave with append-then-release.
use crate::service::MessageRecord;
use std::collections::HashMap;
use tokio::sync::oneshot;

pub type WaiterId = u64;

/// Pending long-poll waiters keyed by an opaque per-registration id.
#[derive(Debug, Default)]
pub struct WaiterTable {
    next_id: WaiterId,
    pending: HashMap<WaiterId, oneshot::Sender<Vec<MessageRecord>>>,
}

impl WaiterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh waiter and hand back its id and the receive half the
    /// caller should await.
    pub fn register(&mut self) -> (WaiterId, oneshot::Receiver<Vec<MessageRecord>>) {
        let (tx, rx) = oneshot::channel();
        let id = self.next_id;
        self.next_id += 1;
        self.pending.insert(id, tx);
        (id, rx)
    }

    /// Remove a waiter that has not been resolved yet, dropping its sender.
    ///
    /// Returns `false` when the waiter was already drained by a release; in
    /// that case the caller lost the race and its messages are waiting in
    /// the oneshot channel.
    pub fn remove(&mut self, id: WaiterId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Drain every pending waiter and resolve each with its own copy of
    /// `messages`. Returns the number of waiters released.
    ///
    /// Waiters registered after this call drains the table wait for the
    /// next release; none of them can observe this one.
    pub fn release_all(&mut self, messages: &[MessageRecord]) -> usize {
        let drained: Vec<_> = self.pending.drain().collect();
        let released = drained.len();
        for (_, tx) in drained {
            // A send error means the client already went away; nothing to do.
            let _ = tx.send(messages.to_vec());
        }
        released
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
