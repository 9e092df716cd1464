//! Uptime decoding and formatting.
//!
//! The collector publishes the boot moment as a Unix timestamp string with a
//! fractional part (`"1700000000.873412"`). Only the first two fractional
//! digits are significant; they are hundredths of a second.

use crate::error::{DashboardError, Result};
use chrono::{DateTime, Duration, Utc};

/// Decode `"<seconds>.<fraction>"` into milliseconds since the epoch.
pub fn decode_uptime(raw: &str) -> Result<i64> {
    let raw = raw.trim();
    let (seconds, fraction) = raw
        .split_once('.')
        .ok_or_else(|| DashboardError::parse_error(format!("uptime {raw:?} has no fractional part")))?;

    let seconds = parse_digits(seconds)
        .ok_or_else(|| DashboardError::parse_error(format!("uptime seconds {seconds:?} are not numeric")))?;

    // A single digit is tenths, so pad it up to hundredths.
    let hundredths: String = fraction.chars().take(2).collect();
    let hundredths = match hundredths.len() {
        1 => parse_digits(&hundredths).map(|tenths| tenths * 10),
        _ => parse_digits(&hundredths),
    }
    .ok_or_else(|| DashboardError::parse_error(format!("uptime fraction {fraction:?} is not numeric")))?;

    seconds
        .checked_mul(1000)
        .and_then(|millis| millis.checked_add(hundredths * 10))
        .ok_or_else(|| DashboardError::parse_error(format!("uptime {raw:?} is out of range")))
}

fn parse_digits(part: &str) -> Option<i64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Elapsed time between the boot moment and `now`, clamped at zero.
pub fn uptime_since(boot_millis: i64, now: DateTime<Utc>) -> Duration {
    let elapsed = now.timestamp_millis().saturating_sub(boot_millis).max(0);
    Duration::milliseconds(elapsed)
}

/// Format an elapsed duration as `dd:hh:mm:ss`.
pub fn format_uptime(elapsed: Duration) -> String {
    let days = elapsed.num_days();
    let hours = elapsed.num_hours() % 24;
    let minutes = elapsed.num_minutes() % 60;
    let seconds = elapsed.num_seconds() % 60;
    format!("{:02}:{:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_millis(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn test_decode_uses_hundredths() {
        assert_eq!(decode_uptime("1000.500000").unwrap(), 1_000_500);
        assert_eq!(decode_uptime("1700000000.07").unwrap(), 1_700_000_000_070);
    }

    #[test]
    fn test_decode_single_fraction_digit_is_tenths() {
        assert_eq!(decode_uptime("12.5").unwrap(), 12_500);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        for raw in ["1000", "", ".50", "1000.", "abc.50", "1000.x5", "-5.00", "1.2.3"] {
            let err = decode_uptime(raw).unwrap_err();
            assert!(matches!(err, DashboardError::ParseError(_)), "{raw:?} gave {err}");
        }
    }

    #[test]
    fn test_elapsed_is_now_minus_boot() {
        let boot = decode_uptime("1000.500000").unwrap();
        let day_hour_minute_second = 86_400_000 + 3_600_000 + 60_000 + 1_000;
        let elapsed = uptime_since(boot, at_millis(1_000_500 + day_hour_minute_second));
        assert_eq!(elapsed.num_milliseconds(), day_hour_minute_second);
        assert_eq!(format_uptime(elapsed), "01:01:01:01");
    }

    #[test]
    fn test_boot_in_the_future_clamps_to_zero() {
        let boot = decode_uptime("1000.500000").unwrap();
        let elapsed = uptime_since(boot, at_millis(1_000_000));
        assert_eq!(elapsed.num_milliseconds(), 0);
        assert_eq!(format_uptime(elapsed), "00:00:00:00");
    }

    #[test]
    fn test_format_pads_and_keeps_large_day_counts() {
        assert_eq!(format_uptime(Duration::seconds(59)), "00:00:00:59");
        assert_eq!(format_uptime(Duration::days(123) + Duration::hours(5)), "123:05:00:00");
    }
}
