//! Time helpers for FinTrack.

use chrono::{DateTime, TimeZone, Utc};

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Get the current wall-clock time in milliseconds.
pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Convert a millisecond timestamp to a UTC datetime.
pub fn to_datetime(timestamp: Timestamp) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(timestamp).single()
}
