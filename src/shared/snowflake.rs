//! Snowflake ID Generator
//!
//! Time-sortable unique ID generation for messages and notifications.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Custom epoch (2020-01-01T00:00:00.000Z)
const EPOCH: u64 = 1577836800000;

/// Snowflake ID generator
///
/// Layout: 41 bits timestamp | 10 bits worker | 12 bits sequence.
pub struct SnowflakeGenerator {
    worker_id: u64,
    sequence: AtomicU64,
    last_timestamp: AtomicU64,
}

impl SnowflakeGenerator {
    /// Create a new snowflake generator
    pub fn new(worker_id: u64) -> Self {
        Self {
            worker_id: worker_id & 0x3FF, // 10 bits
            sequence: AtomicU64::new(0),
            last_timestamp: AtomicU64::new(0),
        }
    }

    /// Generate a new snowflake ID
    pub fn generate(&self) -> i64 {
        let timestamp = self.current_timestamp();
        let last = self.last_timestamp.load(Ordering::SeqCst);

        let sequence = if timestamp == last {
            self.sequence.fetch_add(1, Ordering::SeqCst) & 0xFFF
        } else {
            self.last_timestamp.store(timestamp, Ordering::SeqCst);
            self.sequence.store(0, Ordering::SeqCst);
            0
        };

        let id = ((timestamp - EPOCH) << 22) | (self.worker_id << 12) | sequence;

        id as i64
    }

    /// Get current timestamp in milliseconds
    fn current_timestamp(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_millis() as u64
    }
}

/// Extract timestamp from snowflake ID
pub fn extract_timestamp(snowflake: i64) -> u64 {
    ((snowflake as u64) >> 22) + EPOCH
}
