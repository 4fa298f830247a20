//! Time helpers. Timestamps are Unix milliseconds in JST.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

fn jst_offset() -> FixedOffset {
    // JST is UTC+9, never out of range
    FixedOffset::east_opt(9 * 3600).expect("valid JST offset")
}

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let now_utc = Utc::now();
    let now_jst: DateTime<FixedOffset> = now_utc.with_timezone(&jst_offset());
    now_jst.timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to JST RFC 3339 format
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    // Euclidean split keeps nanos in 0..1_000_000_000 for pre-epoch inputs
    let seconds = timestamp_millis.div_euclid(1000);
    let nanos = (timestamp_millis.rem_euclid(1000) * 1_000_000) as u32;
    match jst_offset().timestamp_opt(seconds, nanos).single() {
        Some(dt) => dt.to_rfc3339(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_jst_timestamp_returns_positive_value() {
        // given / when:
        let timestamp = get_jst_timestamp();

        // then:
        assert!(timestamp > 0);
    }

    #[test]
    fn test_timestamp_to_jst_rfc3339_handles_pre_epoch_timestamps() {
        // given: 1 millisecond before the Unix epoch
        let timestamp = -1;

        // when:
        let result = timestamp_to_jst_rfc3339(timestamp);

        // then: rendered as the JST instant, not an empty string
        assert_eq!(result, "1970-01-01T08:59:59.999+09:00");
    }

    #[test]
    fn test_timestamp_to_jst_rfc3339_format() {
        // given: 2023-01-01 00:00:00 JST in milliseconds
        let timestamp = 1672498800000;

        // when:
        let result = timestamp_to_jst_rfc3339(timestamp);

        // then:
        assert!(result.starts_with("2023-01-01T00:00:00"));
        assert!(result.contains("+09:00"));
    }
}
