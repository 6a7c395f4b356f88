//! Millisecond epoch time helpers, lifted from `bm_mcp::support::time`.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn now_ms() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    let ms = nanos / 1_000_000i128;
    if ms <= 0 {
        0
    } else if ms >= i64::MAX as i128 {
        i64::MAX
    } else {
        ms as i64
    }
}

/// ISO-8601 UTC with a literal `Z` suffix, per spec.md §3.
pub fn ts_ms_to_rfc3339(ts_ms: i64) -> String {
    let nanos = (ts_ms as i128) * 1_000_000i128;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    dt.format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

pub fn now_rfc3339() -> String {
    ts_ms_to_rfc3339(now_ms())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_epoch_zero() {
        assert_eq!(ts_ms_to_rfc3339(0), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn now_rfc3339_ends_with_z() {
        assert!(now_rfc3339().ends_with('Z'));
    }

    #[test]
    fn now_ms_is_monotonic_nondecreasing_across_calls() {
        let a = now_ms();
        let b = now_ms();
        assert!(b >= a);
    }
}
