//! Append-only in-memory message log.
//!
//! # Purpose
//! Holds every accepted message for the lifetime of the process, in arrival
//! order, with timestamps that never regress. Both polling endpoints read
//! from this log.
//!
//! # Durability and growth
//! - **Not durable**: all messages are lost on process restart.
//! - **Unbounded**: the log is never truncated; retention is out of scope
//!   for the relay.
use crate::service::RelayError;
use serde::{Deserialize, Serialize};

/// One accepted message, in the wire shape returned by both polling
/// endpoints.
///
/// `timestamp` is milliseconds since the Unix epoch, assigned at append
/// time. For any two records r1 appended before r2,
/// `r1.timestamp <= r2.timestamp` holds even if the system clock steps
/// backwards between the appends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub message: String,
    pub timestamp: u64,
}

/// Ordered sequence of accepted messages.
///
/// Insertion order, arrival order, and timestamp order coincide; timestamp
/// ties keep insertion order. Records are immutable once appended.
#[derive(Debug, Default)]
pub struct MessageLog {
    records: Vec<MessageRecord>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, stamping it with `now_ms` clamped so timestamps
    /// never move backwards.
    ///
    /// The stored message keeps its original form; only the trimmed view is
    /// validated.
    ///
    /// # Errors
    /// - `RelayError::EmptyMessage` when `content` is empty or
    ///   whitespace-only. The log is left unchanged.
    pub fn append(&mut self, content: &str, now_ms: u64) -> Result<MessageRecord, RelayError> {
        if content.trim().is_empty() {
            return Err(RelayError::EmptyMessage);
        }
        let timestamp = match self.records.last() {
            // Clamp: a backwards clock step must not break timestamp order.
            Some(last) => now_ms.max(last.timestamp),
            None => now_ms,
        };
        let record = MessageRecord {
            message: content.to_string(),
            timestamp,
        };
        self.records.push(record.clone());
        Ok(record)
    }

    /// All records with `timestamp > cutoff`, in log order. Pure read.
    pub fn since(&self, cutoff: u64) -> Vec<MessageRecord> {
        self.records
            .iter()
            .filter(|record| record.timestamp > cutoff)
            .cloned()
            .collect()
    }

    /// The full log in order, for the long-poll immediate-reply path.
    pub fn all(&self) -> Vec<MessageRecord> {
        self.records.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_stamps_and_stores_in_order() {
        let mut log = MessageLog::new();
        let first = log.append("hello", 100).expect("append");
        let second = log.append("world", 200).expect("append");
        assert_eq!(first.timestamp, 100);
        assert_eq!(second.timestamp, 200);
        assert_eq!(log.len(), 2);
        assert_eq!(log.all(), vec![first, second]);
    }

    #[test]
    fn append_rejects_empty_and_whitespace() {
        let mut log = MessageLog::new();
        assert!(matches!(log.append("", 1), Err(RelayError::EmptyMessage)));
        assert!(matches!(
            log.append("   \t\n", 1),
            Err(RelayError::EmptyMessage)
        ));
        assert!(log.is_empty());
    }

    #[test]
    fn append_keeps_original_untrimmed_message() {
        let mut log = MessageLog::new();
        let record = log.append("  hi  ", 1).expect("append");
        assert_eq!(record.message, "  hi  ");
    }

    #[test]
    fn append_clamps_backwards_clock() {
        let mut log = MessageLog::new();
        log.append("a", 500).expect("append");
        let clamped = log.append("b", 300).expect("append");
        assert_eq!(clamped.timestamp, 500);
        let after = log.append("c", 700).expect("append");
        assert_eq!(after.timestamp, 700);
    }

    #[test]
    fn since_filters_strictly_newer() {
        let mut log = MessageLog::new();
        log.append("a", 100).expect("append");
        log.append("b", 200).expect("append");
        log.append("c", 300).expect("append");

        let newer = log.since(100);
        assert_eq!(newer.len(), 2);
        assert_eq!(newer[0].message, "b");
        assert_eq!(newer[1].message, "c");

        // Idempotent: a second read with the same cutoff matches exactly.
        assert_eq!(log.since(100), newer);
        assert!(log.since(300).is_empty());
        assert_eq!(log.since(0).len(), 3);
    }

    #[test]
    fn since_zero_returns_entire_log() {
        let mut log = MessageLog::new();
        log.append("a", 1).expect("append");
        log.append("b", 2).expect("append");
        assert_eq!(log.since(0), log.all());
    }

    #[test]
    fn timestamp_ties_keep_insertion_order() {
        let mut log = MessageLog::new();
        log.append("first", 100).expect("append");
        log.append("second", 100).expect("append");
        let all = log.all();
        assert_eq!(all[0].message, "first");
        assert_eq!(all[1].message, "second");
        assert_eq!(all[0].timestamp, all[1].timestamp);
    }

    #[test]
    fn record_serializes_to_wire_shape() {
        let record = MessageRecord {
            message: "hi".to_string(),
            timestamp: 42,
        };
        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value, serde_json::json!({"message": "hi", "timestamp": 42}));
    }
}
