use std::time::Duration;

use anyhow::{bail, Result};
use chrono::{DateTime, Local, Utc};
use upwatch_types::Timestamp;

/// Suffix to seconds multiplier
const UNITS: &[(&str, u64)] = &[("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)];

/// Parse window strings like "30d", "12h", "45m", "10s". A bare number is days.
pub fn parse_window(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: u64 = val_str.trim().parse()?;
            return Ok(Duration::from_secs(val.saturating_mul(*multiplier)));
        }
    }

    match s.parse::<u64>() {
        Ok(days) => Ok(Duration::from_secs(days.saturating_mul(86_400))),
        Err(_) => bail!("Unknown window format: {}", s),
    }
}

/// Parse a window that must be a whole number of days, e.g. "30d", "720h" or "7".
pub fn parse_days(s: &str) -> Result<i64> {
    let secs = parse_window(s)?.as_secs();
    if secs == 0 || secs % 86_400 != 0 {
        bail!("Window must be a whole number of days: {}", s.trim());
    }
    Ok(i64::try_from(secs / 86_400)?)
}

/// Format elapsed seconds with the two largest units, e.g. "2d 3h" or "42s".
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let (days, hours) = (seconds / 86_400, seconds % 86_400 / 3_600);
    let (minutes, secs) = (seconds % 3_600 / 60, seconds % 60);

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Format an epoch timestamp in local time
pub fn format_timestamp(ts: Timestamp) -> String {
    match DateTime::<Utc>::from_timestamp(ts, 0) {
        Some(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => ts.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_window("30d").unwrap(), Duration::from_secs(30 * 86_400));
        assert_eq!(parse_window(" 90 ").unwrap(), Duration::from_secs(90 * 86_400));
    }

    #[test]
    fn test_parse_smaller_units() {
        assert_eq!(parse_window("12h").unwrap().as_secs(), 43_200);
        assert_eq!(parse_window("45m").unwrap().as_secs(), 2_700);
        assert_eq!(parse_window("10s").unwrap().as_secs(), 10);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_window("soon").is_err());
        assert!(parse_window("1.5d").is_err());
        assert!(parse_window("").is_err());
    }

    #[test]
    fn test_parse_whole_days() {
        assert_eq!(parse_days("30d").unwrap(), 30);
        assert_eq!(parse_days("48h").unwrap(), 2);
        assert_eq!(parse_days("7").unwrap(), 7);
        assert!(parse_days("12h").is_err());
        assert!(parse_days("36h").is_err());
        assert!(parse_days("0d").is_err());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(2 * 86_400 + 3 * 3_600 + 59), "2d 3h");
        assert_eq!(format_elapsed(4 * 3_600 + 12 * 60), "4h 12m");
        assert_eq!(format_elapsed(5 * 60 + 3), "5m 3s");
        assert_eq!(format_elapsed(42), "42s");
        assert_eq!(format_elapsed(-5), "0s");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1_700_000_000).len(), 16);
    }
}
