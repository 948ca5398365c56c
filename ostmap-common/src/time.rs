//! Timestamp and duration format utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Render a millisecond duration as an ISO-8601 duration string (PT3M30S).
///
/// This is the format the store persists for track durations. Hours fold
/// into minutes, matching the upstream data shape (soundtrack cuts are
/// never that long anyway).
pub fn ms_to_iso_duration(ms: u64) -> String {
    if ms == 0 {
        return "PT0M0S".to_string();
    }
    let seconds = (ms / 1000) % 60;
    let minutes = ms / (1000 * 60);
    format!("PT{}M{}S", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_iso_duration_zero() {
        assert_eq!(ms_to_iso_duration(0), "PT0M0S");
    }

    #[test]
    fn test_iso_duration_three_and_a_half_minutes() {
        assert_eq!(ms_to_iso_duration(210_000), "PT3M30S");
    }

    #[test]
    fn test_iso_duration_truncates_sub_second() {
        assert_eq!(ms_to_iso_duration(61_999), "PT1M1S");
    }
}
